//! Compliance review over the audit log
//!
//! Read-only views a safety reviewer uses: filtering and a summary of how
//! decisions were reached.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::models::{AuditEntry, AuditLevel, Priority, SequenceNumber, SuggestionSource};

/// Which entries a listing shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Only this task
    pub task_id: Option<String>,
    /// Only safety overrides
    pub overrides_only: bool,
}

impl AuditFilter {
    /// Whether an entry passes the filter
    #[must_use]
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        let task_ok = self.task_id.as_deref().is_none_or(|id| entry.record.task_id == id);
        task_ok && (!self.overrides_only || entry.was_overridden())
    }

    /// Keep the entries that pass, in log order
    #[must_use]
    pub fn apply(&self, entries: Vec<AuditEntry>) -> Vec<AuditEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// A safety override as the reviewer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideRecord {
    /// Log position
    pub sequence: SequenceNumber,
    /// Task
    pub task_id: String,
    /// Rule that decided
    pub rule_id: String,
    /// Forced priority
    pub priority: Priority,
    /// What the model would have said, if it had an opinion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_priority: Option<Priority>,
}

impl OverrideRecord {
    /// Whether the rule raised the priority above the model's opinion
    #[must_use]
    pub fn overruled_model(&self) -> bool {
        self.model_priority.is_some_and(|p| p < self.priority)
    }
}

/// Totals over an audit log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    /// Entries in the log
    pub total: usize,
    /// Entries per suggestion source
    pub by_source: BTreeMap<String, usize>,
    /// Entries per final priority
    pub by_priority: BTreeMap<String, usize>,
    /// Entries per review level
    pub by_level: BTreeMap<AuditLevel, usize>,
    /// Entries per firing rule
    pub by_rule: BTreeMap<String, usize>,
    /// Decisions made without a model opinion
    pub model_unavailable: usize,
    /// Every safety override, in log order
    pub overrides: Vec<OverrideRecord>,
}

/// Summarize a set of audit entries
#[must_use]
pub fn summarize(entries: &[AuditEntry]) -> AuditSummary {
    let mut summary = AuditSummary {
        total: entries.len(),
        ..AuditSummary::default()
    };

    for entry in entries {
        let suggestion = &entry.record.suggestion;
        *summary.by_source.entry(suggestion.source().to_string()).or_default() += 1;
        *summary.by_priority.entry(suggestion.priority().to_string()).or_default() += 1;
        *summary.by_level.entry(entry.record.level).or_default() += 1;

        let model_priority = entry.record.model.suggestion().map(|s| s.priority);
        if model_priority.is_none() {
            summary.model_unavailable += 1;
        }

        if suggestion.source() == SuggestionSource::SafetyOverride
            && let Some(rule_id) = suggestion.rule_id()
        {
            *summary.by_rule.entry(rule_id.to_string()).or_default() += 1;
            summary.overrides.push(OverrideRecord {
                sequence: entry.sequence,
                task_id: entry.record.task_id.clone(),
                rule_id: rule_id.to_string(),
                priority: suggestion.priority(),
                model_priority,
            });
        }
    }
    summary
}
