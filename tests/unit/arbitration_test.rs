//! Tests for the arbitration engine's merge and audit behavior

use std::sync::Arc;

use floortriage::adapters::audit::InMemoryAuditStore;
use floortriage::adapters::model::KeywordModel;
use floortriage::adapters::toml::embedded_rule_table;
use floortriage::core::error::{MalformedRecordError, TriageError};
use floortriage::core::models::{AuditStatus, Priority, SafetyVerdict, SuggestionSource};
use floortriage::core::ports::AuditStore;
use floortriage::core::services::{ArbitrationEngine, ArbitrationSettings};

use crate::common::fixtures::{REPORTED_AT, RecordBuilder, at, engine, engine_with};
use crate::common::mocks::{FailingAuditStore, FailingModel, FixedModel};

// =============================================================================
// SAFETY OVERRIDES
// =============================================================================

#[test]
fn test_gas_leak_overrides_confident_low_model() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let engine = engine(Arc::new(FixedModel::confident_low()), audit.clone());

    let c = engine.classify(&RecordBuilder::new("Gas leak near boiler 2").build()).unwrap();

    assert_eq!(c.suggestion.source(), SuggestionSource::SafetyOverride);
    assert_eq!(c.suggestion.priority(), Priority::Critical);
    assert_eq!(c.suggestion.category(), "safety");
    assert_eq!(c.suggestion.rule_id(), Some("SR-GAS"));
    assert_eq!(c.suggestion.due_date(), at(REPORTED_AT));
    assert!(c.suggestion.confidence().is_none());

    // The model's opinion only survives in the audit log.
    let entries = audit.entries().unwrap();
    assert_eq!(entries.len(), 1);
    let model = entries[0].record.model.suggestion().unwrap();
    assert_eq!(model.priority, Priority::Low);
    assert!(entries[0].was_overridden());
}

#[test]
fn test_multiple_rules_take_most_restrictive() {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(InMemoryAuditStore::new()));

    let c = engine
        .classify(&RecordBuilder::new("Minor spill beside a gas leak").build())
        .unwrap();

    assert_eq!(c.suggestion.priority(), Priority::Critical);
    assert_eq!(c.suggestion.rule_id(), Some("SR-GAS"));
    assert_eq!(c.suggestion.due_date(), at(REPORTED_AT));
}

#[test]
fn test_end_of_shift_due_date() {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(InMemoryAuditStore::new()));

    let c = engine.classify(&RecordBuilder::new("Oven 3 overheat alarm").build()).unwrap();

    assert_eq!(c.suggestion.priority(), Priority::High);
    assert_eq!(c.suggestion.due_date(), at("2025-12-29T14:00:00+01:00"));
}

#[test]
fn test_night_shift_end_crosses_midnight() {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(InMemoryAuditStore::new()));

    let record = RecordBuilder::new("overheat on line 1")
        .reported_at("2025-12-30T02:30:00+01:00")
        .build();
    let c = engine.classify(&record).unwrap();

    assert_eq!(c.suggestion.due_date(), at("2025-12-30T06:00:00+01:00"));
}

#[test]
fn test_unavailable_model_never_blocks_override() {
    let engine = engine(Arc::new(FailingModel), Arc::new(InMemoryAuditStore::new()));

    let c = engine.classify(&RecordBuilder::new("GAS LEAK!!").build()).unwrap();

    assert_eq!(c.suggestion.source(), SuggestionSource::SafetyOverride);
    assert_eq!(c.suggestion.priority(), Priority::Critical);
}

// =============================================================================
// MODEL AND DEFAULTS
// =============================================================================

#[test]
fn test_model_suggestion_without_rules() {
    let engine = engine(
        Arc::new(FixedModel::new("maintenance", Priority::High, 1, 0.7)),
        Arc::new(InMemoryAuditStore::new()),
    );

    let c = engine.classify(&RecordBuilder::new("Replace conveyor belt bearings").build()).unwrap();

    assert_eq!(c.suggestion.source(), SuggestionSource::ModelSuggestion);
    assert_eq!(c.suggestion.category(), "maintenance");
    assert_eq!(c.suggestion.priority(), Priority::High);
    assert_eq!(c.suggestion.due_date(), at("2025-12-30T10:00:00+01:00"));
    assert!(c.suggestion.rule_id().is_none());
}

#[test]
fn test_model_unavailable_uses_defaults() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let engine = engine(Arc::new(FailingModel), audit.clone());

    let c = engine.classify(&RecordBuilder::new("Label boxes for shipping").build()).unwrap();

    assert_eq!(c.suggestion.source(), SuggestionSource::Default);
    assert_eq!(c.suggestion.category(), "uncategorized");
    assert_eq!(c.suggestion.priority(), Priority::Normal);
    assert_eq!(c.suggestion.due_date(), at("2026-01-01T10:00:00+01:00"));

    let entry = &audit.entries().unwrap()[0];
    assert!(entry.record.model.suggestion().is_none());
    assert_eq!(entry.record.model_version, "failing");
}

#[test]
fn test_low_confidence_threshold_uses_defaults_but_audits_model() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let settings = ArbitrationSettings {
        min_confidence_threshold: 0.8,
        default_category: "triage queue".to_string(),
        ..ArbitrationSettings::default()
    };
    let engine = engine_with(
        Arc::new(FixedModel::new("maintenance", Priority::High, 1, 0.6)),
        audit.clone(),
        settings,
    );

    let c = engine.classify(&RecordBuilder::new("Check pump noise").build()).unwrap();

    assert_eq!(c.suggestion.source(), SuggestionSource::Default);
    assert_eq!(c.suggestion.category(), "triage queue");
    assert!(audit.entries().unwrap()[0].record.model.suggestion().is_some());
}

// =============================================================================
// AUDIT AND INPUT FAILURES
// =============================================================================

#[test]
fn test_audit_failure_is_reported_not_hidden() {
    let engine = engine(Arc::new(FixedModel::confident_low()), Arc::new(FailingAuditStore));

    let c = engine.classify(&RecordBuilder::new("gas leak").build()).unwrap();

    assert_eq!(c.suggestion.priority(), Priority::Critical);
    assert!(matches!(c.audit, AuditStatus::NotDurable { ref reason } if reason.contains("disk full")));
}

#[test]
fn test_blocking_audit_failure_fails_the_call() {
    let settings = ArbitrationSettings {
        audit_write_blocking: true,
        ..ArbitrationSettings::default()
    };
    let engine = engine_with(Arc::new(FixedModel::confident_low()), Arc::new(FailingAuditStore), settings);

    let err = engine.classify(&RecordBuilder::new("gas leak").build()).unwrap_err();
    assert!(matches!(err, TriageError::AuditWrite(_)));
}

#[test]
fn test_missing_equipment_is_rejected_and_not_audited() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let engine = engine(Arc::new(FixedModel::confident_low()), audit.clone());

    let err = engine
        .classify(&RecordBuilder::new("gas leak").id("T-9").without_equipment().build())
        .unwrap_err();

    assert!(matches!(
        err,
        TriageError::MalformedRecord(MalformedRecordError::MissingEquipment { ref task_id }) if task_id == "T-9"
    ));
    assert!(audit.is_empty());
}

#[test]
fn test_empty_description_is_valid() {
    let engine = engine(Arc::new(FailingModel), Arc::new(InMemoryAuditStore::new()));
    let c = engine.classify(&RecordBuilder::new("").build()).unwrap();
    assert_eq!(c.suggestion.source(), SuggestionSource::Default);
}

#[test]
fn test_audit_entry_records_versions_and_features() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let engine = engine(Arc::new(FixedModel::confident_low()), audit.clone());

    engine
        .classify(&RecordBuilder::new("Gas leak in boiler room").tag("Confined Space").build())
        .unwrap();

    let entry = &audit.entries().unwrap()[0];
    assert_eq!(entry.record.rule_table_version, "test-rules-1");
    assert_eq!(entry.record.model_version, "fixed-1");
    assert_eq!(entry.record.features.equipment_id, "BOILER-2");
    assert_eq!(entry.record.features.shift.as_deref(), Some("morning"));
    assert!(entry.record.features.flags.contains("gas leak"));
    assert!(entry.record.features.tags.contains("confined space"));
    assert!(matches!(entry.record.verdict, SafetyVerdict::Override(ref o) if o.triggering_rule_id == "SR-GAS"));
}

// =============================================================================
// SHIPPED ARTIFACTS
// =============================================================================

#[test]
fn test_embedded_rules_and_model_end_to_end() {
    let audit = Arc::new(InMemoryAuditStore::new());
    let engine = ArbitrationEngine::new(
        Arc::new(embedded_rule_table().unwrap()),
        Arc::new(KeywordModel::embedded().unwrap()),
        audit.clone(),
        ArbitrationSettings::default(),
    );

    let gas = engine.classify(&RecordBuilder::new("Gas leak in boiler room").id("T-1").build()).unwrap();
    assert_eq!(gas.suggestion.rule_id(), Some("SR-GAS"));
    assert_eq!(gas.suggestion.priority(), Priority::Critical);

    let boxes = engine.classify(&RecordBuilder::new("Seal boxes for shipping").id("T-2").build()).unwrap();
    assert_eq!(boxes.suggestion.source(), SuggestionSource::ModelSuggestion);
    assert_eq!(boxes.suggestion.category(), "packaging");

    assert_eq!(audit.len(), 2);
}
