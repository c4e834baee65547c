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

//! Conversion of a single mail folder into one aggregate mailbox file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::warn;
use mail_parser::MessageParser;

use super::maildir::{self, MessageFile};
use super::mbox::{companion_dir, MboxWriter};
use crate::support::error::Error;

/// Per-folder conversion counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FolderStats {
    pub converted: usize,
    pub failed: usize,
}

/// Converts the messages of the folder at `source` into an aggregate
/// mailbox file at `dest`.
///
/// The caller must have created `dest`'s parent directory. The aggregate is
/// opened in append mode and exists afterwards even if the folder turns out
/// to contain no messages; the companion directory next to it is created as
/// well, though failure to do so only produces a notice. Failures confined
/// to a single message are logged with the message key and counted in the
/// returned stats; an `Err` return means the folder as a whole could not be
/// converted.
pub fn convert_folder(
    source: &Path,
    dest: &Path,
) -> Result<FolderStats, Error> {
    println!("Creating mbox file: {}", dest.display());

    let companion = companion_dir(dest);
    if let Err(e) = fs::create_dir(&companion) {
        println!("Couldn't create directory: {}", companion.display());
        warn!("unable to create {}: {}", companion.display(), e);
    }

    let aggregate = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dest)?;
    let mut writer = MboxWriter::new(io::BufWriter::new(aggregate));

    let mut stats = FolderStats::default();
    for container in &maildir::CONTAINERS {
        let files = maildir::list_container(&source.join(container))?;
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            if index % 10 == 9 {
                println!("Progress: msg {} of {}", index + 1, total);
            }
            match convert_message(&mut writer, file) {
                Ok(()) => stats.converted += 1,
                Err(e) => {
                    warn!(
                        "failed to convert message {} in {}: {}",
                        file.key,
                        source.display(),
                        e
                    );
                    stats.failed += 1;
                }
            }
        }
    }

    writer.flush()?;
    Ok(stats)
}

fn convert_message<W: Write>(
    writer: &mut MboxWriter<W>,
    file: &MessageFile,
) -> Result<(), Error> {
    let raw = fs::read(&file.path)?;
    if raw.is_empty() {
        return Err(Error::UnparseableMessage);
    }
    let message = MessageParser::new()
        .parse(&raw)
        .ok_or(Error::UnparseableMessage)?;
    writer.append(&message, &raw)?;
    Ok(())
}
