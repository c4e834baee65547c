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

//! Classification of the entries of one source directory listing.
//!
//! KMail expresses folder nesting through a naming convention. A folder
//! `Work` keeps its own messages under `Work/{cur,new}` while its children
//! live beside it in a hidden sibling directory `.Work.directory`. Any
//! directory entry whose name contains a dot and whose second dot-separated
//! component names another entry of the same listing is a marker that the
//! named entry has children; the marker itself is never a mail folder.
//! Several marker spellings can reference the same folder (at minimum,
//! `.Work.directory` always references `Work`), so markers are collected
//! into a set and each referenced name is descended into exactly once.
//!
//! Dotted directories that match nothing, and plain files, are artifacts of
//! the mail client and contribute nothing to the conversion.

use std::collections::{BTreeSet, HashSet};

/// Name suffix of KMail's per-folder index artifacts.
const INDEX_SUFFIX: &str = ".index";

/// What one directory entry means to the conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A plain mail folder, to be converted into an aggregate file.
    MailFolder(String),
    /// A marker that the named sibling entry has nested children under
    /// `.<name>.directory`.
    NestedMarker(String),
    /// Skipped by request or because it is an index artifact.
    Ignored,
    /// A regular file, or a dotted directory that references nothing.
    Unrecognized,
}

/// Classifies a single entry of a directory listing.
///
/// `listing` must contain the names of all entries of the directory,
/// including ones that are themselves ignored, since a marker may reference
/// a folder that is excluded from conversion.
pub fn classify(
    name: &str,
    is_dir: bool,
    listing: &BTreeSet<String>,
    ignore: &HashSet<String>,
) -> EntryKind {
    if name.ends_with(INDEX_SUFFIX) {
        return EntryKind::Ignored;
    }
    if ignore.contains(name) {
        return EntryKind::Ignored;
    }
    if !is_dir {
        return EntryKind::Unrecognized;
    }

    if !name.contains('.') {
        return EntryKind::MailFolder(name.to_owned());
    }

    match name.split('.').nth(1) {
        Some(referenced)
            if !referenced.is_empty() && listing.contains(referenced) =>
        {
            EntryKind::NestedMarker(referenced.to_owned())
        }
        _ => EntryKind::Unrecognized,
    }
}

/// The actionable entries of one directory listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    /// Mail folders, in lexicographic order.
    pub folders: Vec<String>,
    /// Referenced names of nested-folder markers, deduplicated.
    pub markers: BTreeSet<String>,
}

/// Partitions a directory listing into folders to convert and marker names
/// to recurse into.
pub fn partition(
    entries: &[(String, bool)],
    ignore: &HashSet<String>,
) -> Partition {
    let listing: BTreeSet<String> =
        entries.iter().map(|&(ref name, _)| name.clone()).collect();

    let mut partition = Partition::default();
    for &(ref name, is_dir) in entries {
        match classify(name, is_dir, &listing, ignore) {
            EntryKind::MailFolder(name) => partition.folders.push(name),
            EntryKind::NestedMarker(referenced) => {
                partition.markers.insert(referenced);
            }
            EntryKind::Ignored | EntryKind::Unrecognized => (),
        }
    }

    partition.folders.sort();
    partition
}

/// The hidden sibling directory holding the children of folder `name`.
pub fn children_dir_name(name: &str) -> String {
    format!(".{}.directory", name)
}
