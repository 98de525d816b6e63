//! JSON Lines audit log
//!
//! One JSON object per line, appended and synced per entry. The file is only
//! ever opened in append mode. A write that fails halfway is cut back off, and
//! so is an unterminated last line found on open.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use log::{debug, error, warn};

use crate::core::error::AuditWriteError;
use crate::core::models::{AuditEntry, AuditRecord, SequenceNumber};
use crate::core::ports::AuditStore;

/// Append-only audit log backed by a `.jsonl` file
#[derive(Debug)]
pub struct JsonlAuditStore {
    path: PathBuf,
    writer: Mutex<Writer>,
}

#[derive(Debug)]
struct Writer {
    file: File,
    next: SequenceNumber,
    /// Set when a failed write could not be rolled back
    broken: Option<String>,
}

impl JsonlAuditStore {
    /// Open (or create) a log, resuming numbering after its last entry
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be read or opened for appending.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening audit log {}", path.display()))?;
        drop_torn_tail(&path, &file)?;

        let last = read_entries(&path)?.iter().map(|e| e.sequence).max();
        let next = last.map_or(SequenceNumber::FIRST, SequenceNumber::next);
        debug!("audit log {} opened, next entry {next}", path.display());

        Ok(Self {
            path,
            writer: Mutex::new(Writer {
                file,
                next,
                broken: None,
            }),
        })
    }

    /// Location of the log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditStore for JsonlAuditStore {
    fn append(&self, record: AuditRecord) -> Result<SequenceNumber, AuditWriteError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditWriteError::Unavailable("audit log lock poisoned".to_string()))?;

        if let Some(reason) = &writer.broken {
            return Err(AuditWriteError::Unavailable(reason.clone()));
        }

        let sequence = writer.next;
        let mut line = serde_json::to_string(&record.into_entry(sequence))?;
        line.push('\n');

        let len = writer.file.metadata()?.len();
        if let Err(err) = write_line(&mut writer.file, line.as_bytes()) {
            if let Err(rollback) = truncate_to(&writer.file, len) {
                let reason = format!(
                    "audit log {} left with a partial entry ({rollback}); reopen to recover",
                    self.path.display()
                );
                error!("{reason}");
                writer.broken = Some(reason);
            }
            return Err(err.into());
        }

        writer.next = sequence.next();
        Ok(sequence)
    }

    fn entries(&self) -> anyhow::Result<Vec<AuditEntry>> {
        // Hold the writer lock so a concurrent append is never read half-written.
        let _guard = self.writer.lock().map_err(|_| anyhow::anyhow!("audit log lock poisoned"))?;
        read_entries(&self.path)
    }
}

fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line)?;
    file.sync_data()
}

/// Cut the file back to `len` bytes, if anything was written past it
fn truncate_to(file: &File, len: u64) -> std::io::Result<()> {
    if file.metadata()?.len() == len {
        return Ok(());
    }
    file.set_len(len)?;
    file.sync_data()
}

/// Drop an unterminated last line left by a crash mid-write
///
/// Appending after it would glue the next entry onto the torn bytes.
fn drop_torn_tail(path: &Path, file: &File) -> anyhow::Result<()> {
    let content = fs::read(path).with_context(|| format!("reading audit log {}", path.display()))?;
    if content.last().is_none_or(|b| *b == b'\n') {
        return Ok(());
    }
    let keep = content.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
    warn!(
        "{}: dropping {} byte(s) of an unterminated audit entry",
        path.display(),
        content.len() - keep
    );
    truncate_to(file, u64::try_from(keep)?)
        .with_context(|| format!("truncating torn audit entry in {}", path.display()))
}

/// Read every well-formed entry from a log file
///
/// A missing file is an empty log. Lines that do not parse (a torn write
/// after a crash) are skipped with a warning.
fn read_entries(path: &Path) -> anyhow::Result<Vec<AuditEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading audit log {}", path.display()))?;

    let mut entries = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AuditEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!("{}:{}: skipping unreadable audit entry: {err}", path.display(), i + 1),
        }
    }
    Ok(entries)
}
