// src/ledger.rs
//! Append-only alert ledger: one key per line in a plain text file.
//!
//! Lookups are exact-line matches against an in-memory `BTreeSet`, loaded once
//! on open and extended by every `record`. A missing or unreadable file means
//! "nothing alerted yet".
//!
//! The check-then-append is not atomic and the file is not locked; two
//! overlapping runs on the same file can both alert the same key.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::format_iso;

/// Composite alert identity `hotel-date-room`, e.g. `41-2025-12-21-5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlertKey {
    pub hotel_id: String,
    pub date: NaiveDate,
    pub room_id: String,
}

impl AlertKey {
    pub fn new(hotel_id: impl Into<String>, date: NaiveDate, room_id: impl Into<String>) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            date,
            room_id: room_id.into(),
        }
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.hotel_id, format_iso(self.date), self.room_id)
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("alert ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("alert key {0:?} contains a line break")]
    InvalidKey(String),
}

#[derive(Debug)]
pub struct AlertLedger {
    path: PathBuf,
    keys: BTreeSet<String>,
}

impl AlertLedger {
    /// Open (or lazily create on first `record`) the ledger at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let keys = match fs::read_to_string(&path) {
            Ok(s) => parse_lines(&s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "alert ledger unreadable; treating as empty"
                );
                BTreeSet::new()
            }
        };
        tracing::debug!(path = %path.display(), keys = keys.len(), "alert ledger loaded");
        Self { path, keys }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn has_alerted(&self, key: &str) -> bool {
        self.keys.contains(key.trim())
    }

    /// Append `key\n`, creating the file and its parent directory if needed.
    /// Re-recording a known key is a no-op.
    ///
    /// The key is remembered in memory even when the append fails, so the rest
    /// of this run still treats it as alerted.
    pub fn record(&mut self, key: &str) -> Result<(), LedgerError> {
        let key = key.trim();
        if key.contains(['\n', '\r']) || key.is_empty() {
            return Err(LedgerError::InvalidKey(key.to_string()));
        }
        if !self.keys.insert(key.to_string()) {
            return Ok(());
        }
        self.append_line(key).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn has_alerted_key(&self, key: &AlertKey) -> bool {
        self.has_alerted(&key.to_string())
    }

    pub fn record_key(&mut self, key: &AlertKey) -> Result<(), LedgerError> {
        self.record(&key.to_string())
    }

    fn append_line(&self, key: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        f.write_all(format!("{key}\n").as_bytes())?;
        f.flush()
    }
}

fn parse_lines(s: &str) -> BTreeSet<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
