//! In-memory audit store

use std::sync::Mutex;

use crate::core::error::AuditWriteError;
use crate::core::models::{AuditEntry, AuditRecord, SequenceNumber};
use crate::core::ports::AuditStore;

/// Audit store that keeps entries in process memory
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |e| e.len())
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, record: AuditRecord) -> Result<SequenceNumber, AuditWriteError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuditWriteError::Unavailable("audit store lock poisoned".to_string()))?;
        let sequence = entries.last().map_or(SequenceNumber::FIRST, |e| e.sequence.next());
        entries.push(record.into_entry(sequence));
        Ok(sequence)
    }

    fn entries(&self) -> anyhow::Result<Vec<AuditEntry>> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .map_err(|_| anyhow::anyhow!("audit store lock poisoned"))
    }
}
