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

//! The conversion core.
//!
//! A KMail mail store is a tree of maildir-style folders. Each folder is a
//! directory whose messages live as individual files under the `cur` and
//! `new` subdirectories, and whose child folders live in a hidden sibling
//! directory named `.<folder>.directory`. The Thunderbird local-folders
//! store mirrors the same tree as one mbox file per folder plus a
//! `<folder>.sbd` directory holding the children.
//!
//! `walk::walk_and_convert` drives the whole conversion;
//! `folder::convert_folder` turns one source folder into one mbox file.

pub mod classify;
pub mod folder;
pub mod maildir;
pub mod mbox;
pub mod walk;

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Folder names skipped by default: KMail's system folders.
    pub static ref DEFAULT_IGNORE: HashSet<String> =
        ["inbox", "trash", "drafts", "sent-mail", "outbox"]
            .iter()
            .map(|&name| name.to_owned())
            .collect();
}

/// Invocation-scoped conversion parameters, threaded through the walk.
pub struct ConvertContext {
    /// Folder names excluded from conversion. Exact, case-sensitive match;
    /// consulted only when classifying entries, never during recursion.
    pub ignore: HashSet<String>,
}

impl ConvertContext {
    pub fn new(ignore: HashSet<String>) -> Self {
        ConvertContext { ignore }
    }
}

impl Default for ConvertContext {
    fn default() -> Self {
        ConvertContext {
            ignore: DEFAULT_IGNORE.clone(),
        }
    }
}
