//! Safety verdict
//!
//! Output of one rule-table evaluation pass.

use serde::{Deserialize, Serialize};

use super::{DueDatePolicy, Priority};

/// The combined override of every rule that fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyOverride {
    /// Forced category (taken from the triggering rule)
    pub category: String,
    /// Highest priority among matching rules
    pub priority: Priority,
    /// Strictest due-date policy among matching rules
    pub due_date_policy: DueDatePolicy,
    /// The most restrictive matching rule
    pub triggering_rule_id: String,
    /// Why the triggering rule exists
    pub reason: String,
    /// Every rule that matched, in table order
    pub matched_rule_ids: Vec<String>,
}

/// Result of evaluating the safety rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// No rule fired
    NoOverride,
    /// At least one rule fired
    Override(SafetyOverride),
}

impl SafetyVerdict {
    /// Whether any rule fired
    #[must_use]
    pub const fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }

    /// The override, if any
    #[must_use]
    pub const fn as_override(&self) -> Option<&SafetyOverride> {
        match self {
            Self::Override(o) => Some(o),
            Self::NoOverride => None,
        }
    }
}
