//! Error taxonomy for the triage engine
//!
//! Each failure class has its own type so callers can tell an input defect
//! (fix the record) from an environmental problem (model, audit store) or a
//! programming defect (feature shape).

use thiserror::Error;

/// A task record is missing a required structured field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    /// The record has no identity to audit against
    #[error("task record has no id")]
    MissingId,

    /// No equipment identifier
    #[error("task record {task_id}: missing equipment identifier")]
    MissingEquipment {
        /// Offending record
        task_id: String,
    },

    /// No shift timestamp
    #[error("task record {task_id}: missing shift timestamp")]
    MissingShiftTimestamp {
        /// Offending record
        task_id: String,
    },
}

/// The suggestion model could not produce an opinion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelUnavailableError {
    /// The model artifact was never loaded
    #[error("model artifact unavailable: {reason}")]
    ArtifactUnavailable {
        /// Why loading failed
        reason: String,
    },

    /// The artifact was loaded but prediction failed
    #[error("model prediction failed: {reason}")]
    PredictionFailed {
        /// What went wrong
        reason: String,
    },

    /// The model returned something that is not a valid suggestion
    #[error("model returned an invalid suggestion: {reason}")]
    InvalidOutput {
        /// Which contract was violated
        reason: String,
    },
}

/// The audit store could not durably record an entry
#[derive(Debug, Error)]
pub enum AuditWriteError {
    /// Store is not reachable at all
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    /// IO failure while appending
    #[error("audit write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded
    #[error("audit entry could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A feature vector does not fit its vocabulary or the rule table
///
/// Only reachable through a bug in whoever assembled the vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureShapeError {
    /// Count slots do not line up with the vocabulary
    #[error("feature vector has {actual} slots but its vocabulary needs {expected}")]
    Dimension {
        /// Slots the vocabulary requires
        expected: usize,
        /// Slots the vector carries
        actual: usize,
    },

    /// The vocabulary cannot see a keyword a safety rule depends on
    #[error("feature vocabulary lacks rule keyword {term:?}")]
    MissingRuleTerm {
        /// Normalized keyword
        term: String,
    },
}

/// A safety rule table failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleTableError {
    /// Table has no version identifier
    #[error("rule table has no version")]
    MissingVersion,

    /// Rule without an id
    #[error("rule #{position} has no id")]
    MissingRuleId {
        /// 1-based position in the table
        position: usize,
    },

    /// Two rules share an id
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// Rule with no condition at all
    #[error("rule {0} has no conditions (set keywords_any, keywords_all or tags_any)")]
    EmptyPredicate(String),

    /// Override without a category
    #[error("rule {0} has an empty category")]
    EmptyCategory(String),

    /// A field could not be parsed
    #[error("rule {rule_id}: {message}")]
    InvalidField {
        /// Rule the field belongs to
        rule_id: String,
        /// Parse failure
        message: String,
    },
}

/// Errors that fail a single `classify` call
#[derive(Debug, Error)]
pub enum TriageError {
    /// Caller supplied a defective record
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    /// Programming defect in feature assembly
    #[error(transparent)]
    FeatureShape(#[from] FeatureShapeError),

    /// Audit write failed and the engine is configured to block on it
    #[error(transparent)]
    AuditWrite(#[from] AuditWriteError),
}
