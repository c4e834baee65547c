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

use std::path::{Path, PathBuf};
use std::process;

use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use structopt::StructOpt;

/// Relative name of the conversion log, rewritten on every run.
const LOG_FILE: &str = "mail.log";

/// Convert a KMail mail directory (in maildir format) to the Thunderbird
/// mbox format, maintaining folder structure.
///
/// By default, KMail's inbox, outbox, trash, sent-mail and drafts folders
/// are ignored. To make sure that everything gets converted, specify '' to
/// the -i option.
///
/// Messages that cannot be parsed are skipped; each one is recorded, along
/// with the rest of the conversion's progress, in mail.log in the current
/// directory.
///
/// No indexing is performed, so Thunderbird will take some time to display
/// a large converted store the first time it loads the new folders.
#[derive(StructOpt)]
#[structopt(max_term_width = 80)]
pub(super) struct Options {
    /// The path to the KMail directory.
    #[structopt(short, long, parse(from_os_str))]
    pub(super) kmail: PathBuf,

    /// The path to the local folder directory of the Thunderbird mail
    /// store.
    #[structopt(short, long, parse(from_os_str))]
    pub(super) thunder: PathBuf,

    /// A comma separated list of folders to ignore (place the list in
    /// quotes).
    #[structopt(short, long)]
    pub(super) ignore: Option<String>,
}

pub fn main() {
    let opts = Options::from_clap(&match Options::clap().get_matches_safe() {
        Ok(matches) => matches,
        Err(
            e @ clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                ..
            },
        )
        | Err(
            e @ clap::Error {
                kind: clap::ErrorKind::VersionDisplayed,
                ..
            },
        ) => {
            println!("{}", e.message);
            return;
        }
        Err(_) => {
            // Historical behaviour: any argument problem, including being
            // invoked with no arguments at all, shows the full usage text
            // and exits 0.
            if Options::clap().print_long_help().is_ok() {
                println!();
            }
            return;
        }
    });

    if !opts.kmail.exists() {
        eprintln!("'{}' seems to be missing", opts.kmail.display());
        process::exit(1);
    }
    if !opts.thunder.exists() {
        eprintln!("'{}' seems to be missing", opts.thunder.display());
        process::exit(1);
    }

    let kmail = canonicalise(&opts.kmail);
    let thunder = canonicalise(&opts.thunder);

    if let Err(e) = init_logging() {
        eprintln!("Unable to open {}: {}", LOG_FILE, e);
        process::exit(1);
    }

    super::convert::run(&kmail, &thunder, opts.ignore.as_deref());
}

fn canonicalise(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Unable to canonicalise '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}",
        )))
        .append(false)
        .build(LOG_FILE)?;

    let config = Config::builder()
        .appender(Appender::builder().build("mail", Box::new(appender)))
        .build(
            Root::builder()
                .appender("mail")
                .build(log::LevelFilter::Info),
        )?;
    log4rs::init_config(config)?;
    Ok(())
}
