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

//! Recursive traversal of the source folder tree.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};

use super::classify::{self, children_dir_name};
use super::folder::convert_folder;
use super::mbox::companion_dir;
use super::ConvertContext;
use crate::support::error::Error;
use crate::support::file_ops::IgnoreKinds;

/// Walks the tree under `source_root` and mirrors it under `dest_root`.
///
/// Plain mail folders are converted in place; nested-folder markers cause a
/// descent into the corresponding `.<name>.directory` sibling, mirrored
/// into a `<name>.sbd` companion directory on the destination side. A
/// folder that fails to convert is logged and does not disturb its
/// siblings, but an unreadable directory fails the whole walk.
pub fn walk_and_convert(
    source_root: &Path,
    dest_root: &Path,
    ctx: &ConvertContext,
) -> Result<(), Error> {
    let entries = list_entries(source_root)?;
    let partition = classify::partition(&entries, &ctx.ignore);

    for name in &partition.folders {
        println!("Processing folder: {}", name);
        info!("converting folder {}", name);

        let source = source_root.join(name);
        let dest = dest_root.join(name);
        match convert_folder(&source, &dest) {
            Ok(stats) => info!(
                "{}: {} messages converted, {} failed",
                name, stats.converted, stats.failed
            ),
            Err(e) => {
                error!("unable to convert {}: {}", source.display(), e)
            }
        }
    }

    for name in &partition.markers {
        let children_name = children_dir_name(name);
        let children = source_root.join(&children_name);
        if dir_entry_names(&children).ignore_not_found()?.is_empty() {
            continue;
        }

        println!("Processing folders under {}", children_name);
        info!("descending into {}", children_name);

        let dest_children = companion_dir(&dest_root.join(name));
        if let Err(e) = fs::create_dir(&dest_children).ignore_already_exists()
        {
            warn!("unable to create {}: {}", dest_children.display(), e);
            continue;
        }
        walk_and_convert(&children, &dest_children, ctx)?;
    }

    Ok(())
}

/// Lists `(name, is_dir)` for every entry of `dir`.
///
/// Entry names that are not valid UTF-8 cannot participate in the naming
/// convention and are skipped.
fn list_entries(dir: &Path) -> Result<Vec<(String, bool)>, Error> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let is_dir = fs::metadata(entry.path())?.is_dir();
        entries.push((name, is_dir));
    }
    Ok(entries)
}

fn dir_entry_names(dir: &Path) -> io::Result<Vec<OsString>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect()
}
