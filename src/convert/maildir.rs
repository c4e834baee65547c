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

//! Reading of the per-folder message containers.
//!
//! Each mail folder stores one file per message, split across the two flat
//! subdirectories `cur` (seen by the client) and `new` (freshly delivered).
//! Delivery agents append an informational suffix such as `:2,S` to the
//! file name; the name up to the first `:` is the stable, folder-scoped key
//! of the message.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::support::file_ops::IgnoreKinds;

/// The message containers of a folder, in processing order.
///
/// `cur` is converted before `new`, so already-read mail ends up ahead of
/// unread mail in the aggregate file.
pub const CONTAINERS: [&str; 2] = ["cur", "new"];

/// One message file inside a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageFile {
    /// Folder-scoped key: the file name truncated at the first `:`,
    /// decoded lossily. The key only appears in diagnostics; reads go
    /// through `path`.
    pub key: String,
    pub path: PathBuf,
}

/// Lists the message files of one container in lexicographic name order.
///
/// A missing container yields an empty list. Dot files and entries that are
/// not regular files are skipped.
pub fn list_container(container: &Path) -> io::Result<Vec<MessageFile>> {
    let mut files = Vec::new();

    for entry in read_container(container).ignore_not_found()? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if !fs::metadata(entry.path())?.is_file() {
            continue;
        }

        let key = name.splitn(2, ':').next().unwrap_or(&name).to_owned();
        files.push(MessageFile {
            key,
            path: entry.path(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn read_container(container: &Path) -> io::Result<Vec<fs::DirEntry>> {
    fs::read_dir(container)?.collect()
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn lists_in_name_order_with_keys() {
        let tmpdir = tempfile::TempDir::new().unwrap();
        touch(&tmpdir.path().join("2222.host:2,S"));
        touch(&tmpdir.path().join("1111.host"));
        touch(&tmpdir.path().join("3333.host:2,RS"));

        let files = list_container(tmpdir.path()).unwrap();
        assert_eq!(
            vec!["1111.host", "2222.host", "3333.host"],
            files.iter().map(|f| &f.key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn skips_dot_files_and_directories() {
        let tmpdir = tempfile::TempDir::new().unwrap();
        touch(&tmpdir.path().join("msg.host"));
        touch(&tmpdir.path().join(".hidden"));
        fs::create_dir(tmpdir.path().join("subdir")).unwrap();

        let files = list_container(tmpdir.path()).unwrap();
        assert_eq!(1, files.len());
        assert_eq!("msg.host", files[0].key);
    }

    #[test]
    fn missing_container_is_empty() {
        let tmpdir = tempfile::TempDir::new().unwrap();
        let files = list_container(&tmpdir.path().join("new")).unwrap();
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_converts_with_a_lossy_key() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let tmpdir = tempfile::TempDir::new().unwrap();
        let name = OsString::from_vec(b"9999.host\xff:2,S".to_vec());
        touch(&tmpdir.path().join(&name));

        let files = list_container(tmpdir.path()).unwrap();
        assert_eq!(1, files.len());
        assert_eq!("9999.host\u{fffd}", files[0].key);
        assert_eq!(tmpdir.path().join(&name), files[0].path);
    }
}
