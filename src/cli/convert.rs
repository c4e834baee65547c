//-
// Copyright (c) 2020, the kmail2mbox developers
//
// This file is part of kmail2mbox.
//
// kmail2mbox is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// kmail2mbox is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details.
//
// You should have received a copy of the GNU General Public License along
// with kmail2mbox. If not, see <http://www.gnu.org/licenses/>.

use std::collections::HashSet;
use std::path::Path;
use std::process;

use crate::convert::{walk::walk_and_convert, ConvertContext};

pub(super) fn run(kmail: &Path, thunder: &Path, ignore: Option<&str>) {
    let ctx = match ignore {
        Some(list) => ConvertContext::new(parse_ignore_list(list)),
        None => ConvertContext::default(),
    };

    if let Err(e) = walk_and_convert(kmail, thunder, &ctx) {
        eprintln!("Conversion failed: {}", e);
        process::exit(1);
    }
}

/// Splits the `-i` argument into the ignore set.
///
/// The list replaces the default set entirely. An empty argument yields a
/// set containing only the empty string, which matches no folder, so
/// passing '' converts everything.
fn parse_ignore_list(list: &str) -> HashSet<String> {
    list.split(',').map(str::to_owned).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ignore_list_is_comma_separated() {
        let set = parse_ignore_list("spam,2019 archive,outbox");
        assert_eq!(3, set.len());
        assert!(set.contains("spam"));
        assert!(set.contains("2019 archive"));
        assert!(set.contains("outbox"));
    }

    #[test]
    fn empty_ignore_list_matches_no_folder() {
        let set = parse_ignore_list("");
        assert_eq!(1, set.len());
        assert!(set.contains(""));
        assert!(!set.contains("inbox"));
    }
}
