//! Model suggestions and final task suggestions
//!
//! [`ModelSuggestion`] is an opinion. [`TaskSuggestion`] is the decision the
//! engine hands to the presentation layer for human approval.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Priority;

/// Per-field confidence of a model suggestion, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConfidence {
    /// Confidence in the category
    pub category: f64,
    /// Confidence in the priority
    pub priority: f64,
    /// Confidence in the due-date offset
    pub due_date: f64,
}

impl FieldConfidence {
    /// Build confidences, clamping into `[0, 1]` (NaN becomes 0)
    #[must_use]
    pub fn new(category: f64, priority: f64, due_date: f64) -> Self {
        Self {
            category: clamp_unit(category),
            priority: clamp_unit(priority),
            due_date: clamp_unit(due_date),
        }
    }

    /// Weakest field confidence
    #[must_use]
    pub fn overall(&self) -> f64 {
        self.category.min(self.priority).min(self.due_date)
    }

    /// Whether every field lies in `[0, 1]`
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.category, self.priority, self.due_date].iter().all(|c| (0.0..=1.0).contains(c))
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// What a suggestion model thinks about a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSuggestion {
    /// Suggested category
    pub category: String,
    /// Suggested priority
    pub priority: Priority,
    /// Days from the report until the task is due
    pub due_date_offset_days: u32,
    /// Confidence per field
    pub confidence: FieldConfidence,
    /// Model artifact that produced this
    pub model_version: String,
    /// Scored priority, when a category floor raised it to `priority`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised_from: Option<Priority>,
}

/// Where the final suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// A safety rule fired
    SafetyOverride,
    /// The model's opinion was used
    ModelSuggestion,
    /// Configured defaults (model unavailable or not confident enough)
    Default,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SafetyOverride => write!(f, "safety_override"),
            Self::ModelSuggestion => write!(f, "model_suggestion"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The engine's final suggestion for one task
///
/// Built only through the `from_*` constructors, which keep `rule_id` present
/// exactly for safety overrides and `confidence` exactly for model suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    task_id: String,
    category: String,
    priority: Priority,
    due_date: DateTime<FixedOffset>,
    source: SuggestionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<FieldConfidence>,
}

impl TaskSuggestion {
    /// Suggestion forced by a safety rule
    #[must_use]
    pub fn from_override(
        task_id: &str,
        category: &str,
        priority: Priority,
        due_date: DateTime<FixedOffset>,
        rule_id: &str,
    ) -> Self {
        Self {
            task_id: task_id.to_string(),
            category: category.to_string(),
            priority,
            due_date,
            source: SuggestionSource::SafetyOverride,
            rule_id: Some(rule_id.to_string()),
            confidence: None,
        }
    }

    /// Suggestion taken from the model
    #[must_use]
    pub fn from_model(
        task_id: &str,
        suggestion: &ModelSuggestion,
        due_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            task_id: task_id.to_string(),
            category: suggestion.category.clone(),
            priority: suggestion.priority,
            due_date,
            source: SuggestionSource::ModelSuggestion,
            rule_id: None,
            confidence: Some(suggestion.confidence),
        }
    }

    /// Suggestion built from configured defaults
    #[must_use]
    pub fn from_default(
        task_id: &str,
        category: &str,
        priority: Priority,
        due_date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            task_id: task_id.to_string(),
            category: category.to_string(),
            priority,
            due_date,
            source: SuggestionSource::Default,
            rule_id: None,
            confidence: None,
        }
    }

    /// Task this suggestion is for
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Suggested category
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Suggested priority
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Absolute due date
    #[must_use]
    pub const fn due_date(&self) -> DateTime<FixedOffset> {
        self.due_date
    }

    /// Where the decision came from
    #[must_use]
    pub const fn source(&self) -> SuggestionSource {
        self.source
    }

    /// Triggering rule (safety overrides only)
    #[must_use]
    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    /// Model confidence (model suggestions only)
    #[must_use]
    pub const fn confidence(&self) -> Option<FieldConfidence> {
        self.confidence
    }
}
