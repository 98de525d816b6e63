//! Task record model
//!
//! The raw report a supervisor or operator files from the floor. The engine
//! reads it once and never mutates it.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A raw task/issue report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Identity of the task in the external store
    #[serde(default)]
    pub id: String,

    /// Free-text description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Equipment the task concerns (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<String>,

    /// Role of the person reporting: "operator", "supervisor", ...
    #[serde(default = "default_role")]
    pub reporter_role: String,

    /// When the task was reported, in plant-local time (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_timestamp: Option<DateTime<FixedOffset>>,

    /// Optional structured tags
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

fn default_role() -> String {
    "operator".to_string()
}

impl TaskRecord {
    /// Create a record with every required field present
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        equipment_id: impl Into<String>,
        shift_timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            equipment_id: Some(equipment_id.into()),
            reporter_role: default_role(),
            shift_timestamp: Some(shift_timestamp),
            tags: BTreeSet::new(),
        }
    }

    /// Set the reporter role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.reporter_role = role.into();
        self
    }

    /// Add a structured tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

/// Generate a task id for records submitted without one
#[must_use]
pub fn generate_task_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    format!("t{ts:x}")
}
