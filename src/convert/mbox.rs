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

//! Writing of the aggregate mailbox format.
//!
//! One folder becomes one file of concatenated messages, each introduced by
//! a separator line of the form `From <sender> <date>`. Thunderbird
//! displays messages in file order and recognises any body line starting
//! with `From ` as the start of the next message, so such lines are escaped
//! to `>From ` on the way in. Header lines are written untouched.
//!
//! A mailbox file `Work` may be accompanied by a directory `Work.sbd`
//! holding the mailbox files of its child folders.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mail_parser::Message;

/// Timestamp format of the separator line.
const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Separator-line sender used when a message has no envelope sender.
const FALLBACK_SENDER: &str = "MAILER-DAEMON";

/// Name suffix of the companion directory that holds a mailbox's children.
pub const COMPANION_SUFFIX: &str = ".sbd";

/// The companion directory for the aggregate file at `path`.
pub fn companion_dir(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(COMPANION_SUFFIX);
    PathBuf::from(name)
}

/// Appends messages to one aggregate mailbox file.
pub struct MboxWriter<W: Write> {
    out: W,
}

impl<W: Write> MboxWriter<W> {
    pub fn new(out: W) -> Self {
        MboxWriter { out }
    }

    /// Appends one message.
    ///
    /// The separator line names the message's first sender address, or
    /// `MAILER-DAEMON` if it has none, and renders the message date in UTC,
    /// falling back to the current time when the date is absent or
    /// unparseable.
    pub fn append(
        &mut self,
        message: &Message<'_>,
        raw: &[u8],
    ) -> io::Result<()> {
        let sender = message
            .from()
            .and_then(|from| from.first())
            .and_then(|addr| addr.address())
            .unwrap_or(FALLBACK_SENDER);
        let date = message
            .date()
            .and_then(|d| DateTime::from_timestamp(d.to_timestamp(), 0))
            .unwrap_or_else(Utc::now);
        writeln!(self.out, "From {} {}", sender, date.format(DATE_FORMAT))?;

        write_payload(&mut self.out, raw)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writes the raw message with body `From ` lines escaped, terminated by a
/// newline (if the payload lacks one) plus one blank separator line.
fn write_payload(out: &mut impl Write, raw: &[u8]) -> io::Result<()> {
    let body = body_start(raw);

    let mut line_start = 0;
    while line_start < raw.len() {
        let line_end = memchr::memchr(b'\n', &raw[line_start..])
            .map(|ix| line_start + ix + 1)
            .unwrap_or(raw.len());
        if line_start >= body && raw[line_start..].starts_with(b"From ") {
            out.write_all(b">")?;
        }
        out.write_all(&raw[line_start..line_end])?;
        line_start = line_end;
    }

    if !raw.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.write_all(b"\n")
}

/// Returns the offset of the first byte after the blank line separating the
/// headers from the body, or `raw.len()` if there is no body.
fn body_start(raw: &[u8]) -> usize {
    let mut line_start = 0;
    for nl in memchr::memchr_iter(b'\n', raw) {
        let line = &raw[line_start..nl];
        if line.is_empty() || line == b"\r" {
            return nl + 1;
        }
        line_start = nl + 1;
    }
    raw.len()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn payload_string(raw: &[u8]) -> String {
        let mut out = Vec::new();
        write_payload(&mut out, raw).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn append_one(raw: &[u8]) -> String {
        let message = mail_parser::MessageParser::new().parse(raw).unwrap();
        let mut out = Vec::new();
        MboxWriter::new(&mut out).append(&message, raw).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn separator_uses_sender_and_date() {
        let out = append_one(
            b"From: alice@example.com\r\n\
              Date: Tue, 1 Jan 2019 12:00:00 +0000\r\n\
              Subject: test\r\n\r\nBody\r\n",
        );
        assert!(
            out.starts_with(
                "From alice@example.com Tue Jan 01 12:00:00 2019\n"
            ),
            "unexpected separator: {}",
            out.lines().next().unwrap()
        );
    }

    #[test]
    fn separator_falls_back_without_sender_or_date() {
        let out = append_one(b"Subject: test\n\nBody\n");
        assert!(
            out.starts_with("From MAILER-DAEMON "),
            "unexpected separator: {}",
            out.lines().next().unwrap()
        );
    }

    #[test]
    fn body_from_lines_are_escaped() {
        let out = payload_string(b"Subject: test\n\nFrom here on\nother\n");
        assert_eq!("Subject: test\n\n>From here on\nother\n\n", out);
    }

    #[test]
    fn header_lines_are_never_escaped() {
        let out = payload_string(
            b"From odd: header\nSubject: test\n\nFrom body line\n",
        );
        assert_eq!(
            "From odd: header\nSubject: test\n\n>From body line\n\n",
            out
        );
    }

    #[test]
    fn crlf_blank_line_starts_the_body() {
        let out = payload_string(b"Subject: test\r\n\r\nFrom x\r\n");
        assert_eq!("Subject: test\r\n\r\n>From x\r\n\n", out);
    }

    #[test]
    fn unterminated_payload_is_terminated() {
        let out = payload_string(b"Subject: test\n\nno trailing newline");
        assert_eq!("Subject: test\n\nno trailing newline\n\n", out);
    }

    #[test]
    fn all_header_message_has_no_body_to_escape() {
        let out = payload_string(b"Subject: test\nFrom: x@y\n");
        assert_eq!("Subject: test\nFrom: x@y\n\n", out);
    }

    #[test]
    fn messages_are_separated_by_a_blank_line() {
        let raw: &[u8] = b"Subject: test\n\nBody\n";
        let message = mail_parser::MessageParser::new().parse(raw).unwrap();
        let mut out = Vec::new();
        let mut writer = MboxWriter::new(&mut out);
        writer.append(&message, raw).unwrap();
        writer.append(&message, raw).unwrap();

        let out = String::from_utf8(out).unwrap();
        let separators = out
            .lines()
            .filter(|line| line.starts_with("From "))
            .count();
        assert_eq!(2, separators);
        assert!(out.contains("Body\n\nFrom "));
    }

    #[test]
    fn companion_dir_appends_suffix() {
        assert_eq!(
            PathBuf::from("/dest/Work.sbd"),
            companion_dir(Path::new("/dest/Work"))
        );
    }

    /// Strips the writer's own transformations from a written payload,
    /// recovering the original bytes of a newline-terminated message.
    fn recover_payload(written: &str) -> String {
        // Drop the blank separator line.
        let payload = written.strip_suffix('\n').unwrap();

        let mut recovered = String::new();
        let mut in_body = false;
        for (ix, line) in payload.split('\n').enumerate() {
            if 0 != ix {
                recovered.push('\n');
            }
            match line.strip_prefix(">From ") {
                Some(rest) if in_body => {
                    recovered.push_str("From ");
                    recovered.push_str(rest);
                }
                _ => recovered.push_str(line),
            }
            if line.is_empty() {
                in_body = true;
            }
        }
        recovered
    }

    proptest! {
        #[test]
        fn escaping_preserves_payload(
            lines in prop::collection::vec(
                prop_oneof![
                    "From [a-z ]{0,12}",
                    "[a-z ]{0,16}",
                    Just(String::new()),
                ],
                0..12,
            ),
        ) {
            let raw = format!("Subject: test\n\n{}\n", lines.join("\n"));
            let written = payload_string(raw.as_bytes());

            // The body must never contain an unescaped separator line.
            let mut in_body = false;
            for line in written.lines() {
                prop_assert!(!(in_body && line.starts_with("From ")));
                if line.is_empty() {
                    in_body = true;
                }
            }

            prop_assert_eq!(raw, recover_payload(&written));
        }
    }
}
