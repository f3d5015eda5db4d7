//! Append-only review journal.
//!
//! Every graded review is appended to a JSONL file with file locking.
//! Reads are strict: a line that fails to parse aborts the whole read,
//! so downstream aggregation never silently under-counts.

use crate::{Error, Quality, Result, ReviewRecord};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One journal line: which card, and how the review went
#[derive(Clone, Debug, PartialEq)]
pub struct JournalEntry {
    pub card_id: Uuid,
    pub record: ReviewRecord,
}

/// On-disk line format
#[derive(Debug, Serialize, Deserialize)]
struct RawEntry {
    card_id: String,
    reviewed_at: String,
    quality: u8,
    was_correct: bool,
}

impl From<&JournalEntry> for RawEntry {
    fn from(entry: &JournalEntry) -> Self {
        RawEntry {
            card_id: entry.card_id.to_string(),
            reviewed_at: entry.record.reviewed_at.to_rfc3339(),
            quality: entry.record.quality.value(),
            was_correct: entry.record.was_correct,
        }
    }
}

impl TryFrom<RawEntry> for JournalEntry {
    type Error = Error;

    fn try_from(raw: RawEntry) -> Result<Self> {
        let card_id = Uuid::parse_str(&raw.card_id)
            .map_err(|e| Error::Journal(format!("invalid card id '{}': {}", raw.card_id, e)))?;

        let reviewed_at = DateTime::parse_from_rfc3339(&raw.reviewed_at)
            .map_err(|e| Error::InvalidTimestamp {
                value: raw.reviewed_at.clone(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        let quality = Quality::new(raw.quality)?;

        Ok(JournalEntry {
            card_id,
            record: ReviewRecord {
                reviewed_at,
                quality,
                was_correct: raw.was_correct,
            },
        })
    }
}

/// Review sink trait for persisting graded reviews
pub trait ReviewSink {
    fn append(&mut self, entry: &JournalEntry) -> Result<()>;
}

/// JSONL-based review journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl ReviewSink for JsonlJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&RawEntry::from(entry))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended review of card {} to journal", entry.card_id);
        Ok(())
    }
}

/// Read every entry from a journal file.
///
/// Returns an empty collection when the file doesn't exist. Any
/// malformed line is an error for the whole read.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();
    let mut parse_error = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                parse_error = Some(Error::Io(e));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawEntry = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(e) => {
                parse_error = Some(Error::Journal(format!(
                    "malformed entry at line {}: {}",
                    line_num + 1,
                    e
                )));
                break;
            }
        };

        match JournalEntry::try_from(raw) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                parse_error = Some(e);
                break;
            }
        }
    }

    file.unlock()?;

    if let Some(error) = parse_error {
        return Err(error);
    }

    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}
