//! Audit store port
//!
//! Defines the append-only interface for recording arbitration decisions.

use super::super::error::AuditWriteError;
use super::super::models::{AuditEntry, AuditRecord, SequenceNumber};

/// Append-only store for audit entries
///
/// There is no update or delete. Implementations assign sequence
/// numbers and write the entry inside one critical section, so entries come
/// back in strictly increasing sequence order.
#[cfg_attr(test, mockall::automock)]
pub trait AuditStore: Send + Sync {
    /// Append a decision, returning its sequence number
    fn append(&self, record: AuditRecord) -> Result<SequenceNumber, AuditWriteError>;

    /// All entries in append order
    fn entries(&self) -> anyhow::Result<Vec<AuditEntry>>;

    /// Entries for one task, in append order
    fn entries_for_task(&self, task_id: &str) -> anyhow::Result<Vec<AuditEntry>> {
        Ok(self.entries()?.into_iter().filter(|e| e.record.task_id == task_id).collect())
    }

    /// Look up a single entry
    fn get(&self, sequence: SequenceNumber) -> anyhow::Result<Option<AuditEntry>> {
        Ok(self.entries()?.into_iter().find(|e| e.sequence == sequence))
    }
}
