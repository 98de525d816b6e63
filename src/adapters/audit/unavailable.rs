//! Audit store stand-in for a log that could not be opened

use crate::core::error::AuditWriteError;
use crate::core::models::{AuditEntry, AuditRecord, SequenceNumber};
use crate::core::ports::AuditStore;

/// Rejects every write with the reason the real store failed to open
///
/// Classification keeps working; every suggestion comes back not durable.
#[derive(Debug, Clone)]
pub struct UnavailableAuditStore {
    reason: String,
}

impl UnavailableAuditStore {
    /// Create a stand-in carrying the open failure
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AuditStore for UnavailableAuditStore {
    fn append(&self, _record: AuditRecord) -> Result<SequenceNumber, AuditWriteError> {
        Err(AuditWriteError::Unavailable(self.reason.clone()))
    }

    fn entries(&self) -> anyhow::Result<Vec<AuditEntry>> {
        anyhow::bail!("audit log unavailable: {}", self.reason)
    }
}
