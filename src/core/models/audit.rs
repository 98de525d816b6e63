//! Audit log entries
//!
//! One entry per arbitration decision, written once and never changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FeatureSummary, ModelSuggestion, SafetyVerdict, SuggestionSource, TaskSuggestion};

/// Position of an entry in the audit log, strictly increasing from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// The first sequence number a fresh log hands out
    pub const FIRST: Self = Self(1);

    /// The number after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the model contributed to a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    /// The model produced an opinion (used or not)
    Suggested {
        /// The opinion
        suggestion: ModelSuggestion,
    },
    /// The model could not produce an opinion
    Unavailable {
        /// Why
        reason: String,
    },
}

impl ModelOutcome {
    /// The suggestion, if the model produced one
    #[must_use]
    pub const fn suggestion(&self) -> Option<&ModelSuggestion> {
        match self {
            Self::Suggested { suggestion } => Some(suggestion),
            Self::Unavailable { .. } => None,
        }
    }
}

/// How much attention a decision deserves when reviewing the log
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// Routine decision
    #[default]
    Info,
    /// The model's priority was raised by a category floor
    Warning,
    /// A safety rule decided the task
    Critical,
}

impl AuditLevel {
    /// All levels, least severe first
    pub const ALL: [Self; 3] = [Self::Info, Self::Warning, Self::Critical];

    /// Level of a decision from its verdict, model outcome and final suggestion
    #[must_use]
    pub fn assess(verdict: &SafetyVerdict, model: &ModelOutcome, suggestion: &TaskSuggestion) -> Self {
        if verdict.is_override() {
            return Self::Critical;
        }
        let raised = model.suggestion().is_some_and(|m| m.raised_from.is_some());
        if raised && suggestion.source() == SuggestionSource::ModelSuggestion {
            Self::Warning
        } else {
            Self::Info
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Everything about one decision except its position in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Task the decision was made for
    pub task_id: String,
    /// Wall-clock time the decision was recorded
    pub recorded_at: DateTime<Utc>,
    /// Version of the rule table in force
    pub rule_table_version: String,
    /// Version of the model artifact in force
    pub model_version: String,
    /// Review severity (entries written before levels existed read as info)
    #[serde(default)]
    pub level: AuditLevel,
    /// Summary of the extracted features
    pub features: FeatureSummary,
    /// Safety rule verdict
    pub verdict: SafetyVerdict,
    /// Model contribution
    pub model: ModelOutcome,
    /// Final suggestion
    pub suggestion: TaskSuggestion,
}

impl AuditRecord {
    /// Stamp the record with its sequence number
    #[must_use]
    pub fn into_entry(self, sequence: SequenceNumber) -> AuditEntry {
        AuditEntry {
            sequence,
            record: self,
        }
    }
}

/// An immutable, sequenced audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the log
    pub sequence: SequenceNumber,
    /// The decision
    #[serde(flatten)]
    pub record: AuditRecord,
}

impl AuditEntry {
    /// Whether a safety rule decided this task
    #[must_use]
    pub const fn was_overridden(&self) -> bool {
        self.record.verdict.is_override()
    }
}

/// Whether a suggestion reached the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "audit", rename_all = "snake_case")]
pub enum AuditStatus {
    /// Written durably at this position
    Durable {
        /// Assigned sequence number
        sequence: SequenceNumber,
    },
    /// Not written; the presentation layer decides whether to block approval
    NotDurable {
        /// Why the write failed
        reason: String,
    },
}

impl AuditStatus {
    /// Whether the entry was durably recorded
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Durable { .. })
    }
}

/// Result of one `classify` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The suggestion for human approval
    pub suggestion: TaskSuggestion,
    /// Whether the decision was durably audited
    pub audit: AuditStatus,
}
