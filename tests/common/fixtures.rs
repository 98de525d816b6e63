//! Test fixtures and builders
//!
//! Provides convenient builders for creating test data.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use floortriage::core::models::{
    DueDatePolicy, OverrideSpec, Priority, RulePredicate, RuleTable, SafetyRule, TaskRecord,
};
use floortriage::core::ports::{AuditStore, SuggestionModel};
use floortriage::core::services::{ArbitrationEngine, ArbitrationSettings};

/// Fixed report time, inside the morning shift
pub const REPORTED_AT: &str = "2025-12-29T10:00:00+01:00";

/// Parse an RFC 3339 timestamp
pub fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Builder for creating test task records
pub struct RecordBuilder {
    record: TaskRecord,
}

impl RecordBuilder {
    pub fn new(description: &str) -> Self {
        Self {
            record: TaskRecord::new("T-1", description, "BOILER-2", at(REPORTED_AT)),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.record.id = id.to_string();
        self
    }

    pub fn reported_at(mut self, ts: &str) -> Self {
        self.record.shift_timestamp = Some(at(ts));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.record.tags.insert(tag.to_string());
        self
    }

    pub fn without_equipment(mut self) -> Self {
        self.record.equipment_id = None;
        self
    }

    pub fn build(self) -> TaskRecord {
        self.record
    }
}

/// A keyword rule
pub fn rule(id: &str, keyword: &str, category: &str, priority: Priority, due: DueDatePolicy) -> SafetyRule {
    SafetyRule {
        id: id.to_string(),
        name: id.to_string(),
        reason: format!("{keyword} hazard"),
        when: RulePredicate {
            keywords_any: vec![keyword.to_string()],
            ..RulePredicate::default()
        },
        then: OverrideSpec {
            category: category.to_string(),
            priority,
            due,
        },
    }
}

/// Gas leak (critical, immediate) and minor spill (normal, 1d)
pub fn plant_rules() -> RuleTable {
    RuleTable::new(
        "test-rules-1",
        vec![
            rule("SR-SPILL", "minor spill", "housekeeping", Priority::Normal, DueDatePolicy::OffsetDays(1)),
            rule("SR-GAS", "gas leak", "safety", Priority::Critical, DueDatePolicy::Immediate),
            rule("SR-OVEN", "overheat", "quality", Priority::High, DueDatePolicy::EndOfShift),
        ],
    )
    .unwrap()
}

/// Engine over [`plant_rules`] with default settings
pub fn engine(model: Arc<dyn SuggestionModel>, audit: Arc<dyn AuditStore>) -> ArbitrationEngine {
    engine_with(model, audit, ArbitrationSettings::default())
}

/// Engine over [`plant_rules`] with explicit settings
pub fn engine_with(
    model: Arc<dyn SuggestionModel>,
    audit: Arc<dyn AuditStore>,
    settings: ArbitrationSettings,
) -> ArbitrationEngine {
    ArbitrationEngine::new(Arc::new(plant_rules()), model, audit, settings)
}
