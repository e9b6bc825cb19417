//! Append-only attendance ledger backed by a flat CSV file.
//!
//! Once the file exists it always starts with exactly one header row; events
//! are appended in order and never rewritten. Rows stay unambiguous because
//! identity names exclude `,` by construction.

use crate::identity::IdentityName;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Header line the ledger file always starts with.
pub const LEDGER_HEADER: &str = "Name,Timestamp";

/// On-disk timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger header mismatch: expected {LEDGER_HEADER:?}, found {0:?}")]
    BadHeader(String),
    #[error("malformed ledger row {line}: {text:?}")]
    BadRow { line: usize, text: String },
    #[error("unparseable timestamp on ledger row {line}: {text:?}")]
    BadTimestamp { line: usize, text: String },
}

/// One recorded identification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEvent {
    pub name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
}

/// Handle to the attendance file. The file is created, header included, on
/// the first append.
pub struct Ledger {
    path: PathBuf,
    /// Serializes appenders within this process; each append is a single
    /// `write_all` of a fully assembled buffer on an append-mode handle.
    write_guard: Mutex<()>,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one identification event.
    pub fn append(&self, name: &IdentityName, timestamp: NaiveDateTime) -> Result<(), LedgerError> {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut buf = String::new();
        if file.metadata()?.len() == 0 {
            buf.push_str(LEDGER_HEADER);
            buf.push('\n');
        }
        buf.push_str(name.as_str());
        buf.push(',');
        buf.push_str(&timestamp.format(TIMESTAMP_FORMAT).to_string());
        buf.push('\n');

        file.write_all(buf.as_bytes())?;
        tracing::info!(
            name = %name,
            timestamp = %timestamp.format(TIMESTAMP_FORMAT),
            "attendance recorded"
        );
        Ok(())
    }

    /// Read every event in file order. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<AttendanceEvent>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut lines = reader.lines();

        let header = match lines.next() {
            None => return Ok(Vec::new()),
            Some(line) => line?,
        };
        if header != LEDGER_HEADER {
            return Err(LedgerError::BadHeader(header));
        }

        let mut events = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            let line_no = idx + 2;
            let Some((name, raw_ts)) = line.split_once(',') else {
                return Err(LedgerError::BadRow {
                    line: line_no,
                    text: line.clone(),
                });
            };
            let timestamp = NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT).map_err(
                |_| LedgerError::BadTimestamp {
                    line: line_no,
                    text: raw_ts.to_string(),
                },
            )?;
            events.push(AttendanceEvent {
                name: name.to_string(),
                timestamp,
            });
        }
        Ok(events)
    }
}
