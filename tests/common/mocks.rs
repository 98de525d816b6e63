//! Mock implementations of port traits for testing
//!
//! These mocks provide fixed behavior for unit testing without real
//! artifacts or I/O.

use floortriage::core::error::{AuditWriteError, ModelUnavailableError};
use floortriage::core::models::{
    AuditEntry, AuditRecord, FeatureVector, FieldConfidence, ModelSuggestion, Priority,
    SequenceNumber,
};
use floortriage::core::ports::{AuditStore, SuggestionModel};

/// Model that always gives the same opinion
pub struct FixedModel {
    suggestion: ModelSuggestion,
}

impl FixedModel {
    pub fn new(category: &str, priority: Priority, offset_days: u32, confidence: f64) -> Self {
        Self {
            suggestion: ModelSuggestion {
                category: category.to_string(),
                priority,
                due_date_offset_days: offset_days,
                confidence: FieldConfidence::new(confidence, confidence, confidence),
                model_version: "fixed-1".to_string(),
                raised_from: None,
            },
        }
    }

    /// Low priority, very confident
    pub fn confident_low() -> Self {
        Self::new("packaging", Priority::Low, 5, 0.95)
    }
}

impl SuggestionModel for FixedModel {
    fn version(&self) -> String {
        self.suggestion.model_version.clone()
    }

    fn predict(&self, _features: &FeatureVector) -> Result<ModelSuggestion, ModelUnavailableError> {
        Ok(self.suggestion.clone())
    }
}

/// Model whose artifact never loaded
pub struct FailingModel;

impl SuggestionModel for FailingModel {
    fn version(&self) -> String {
        "failing".to_string()
    }

    fn predict(&self, _features: &FeatureVector) -> Result<ModelSuggestion, ModelUnavailableError> {
        Err(ModelUnavailableError::PredictionFailed {
            reason: "inference runtime crashed".to_string(),
        })
    }
}

/// Audit store whose disk is gone
pub struct FailingAuditStore;

impl AuditStore for FailingAuditStore {
    fn append(&self, _record: AuditRecord) -> Result<SequenceNumber, AuditWriteError> {
        Err(AuditWriteError::Unavailable("disk full".to_string()))
    }

    fn entries(&self) -> anyhow::Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}
