//! Tests for the audit store adapters

use std::fs;
use std::sync::Arc;

use floortriage::adapters::audit::{InMemoryAuditStore, JsonlAuditStore, UnavailableAuditStore};
use floortriage::core::models::{AuditStatus, SequenceNumber};
use floortriage::core::ports::AuditStore;
use floortriage::core::services::{AuditFilter, summarize};
use tempfile::TempDir;

use crate::common::fixtures::{RecordBuilder, engine};
use crate::common::mocks::FixedModel;

/// Classify a handful of records into `store`
fn classify_into(store: Arc<dyn AuditStore>, descriptions: &[(&str, &str)]) {
    let engine = engine(Arc::new(FixedModel::confident_low()), store);
    for (id, description) in descriptions {
        let c = engine.classify(&RecordBuilder::new(description).id(id).build()).unwrap();
        assert!(c.audit.is_durable());
    }
}

#[test]
fn test_jsonl_appends_one_line_per_decision() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".triage/audit.jsonl");
    let store = Arc::new(JsonlAuditStore::open(&path).unwrap());

    classify_into(store.clone(), &[("T-1", "gas leak"), ("T-2", "stack pallets")]);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().all(|l| l.starts_with('{')));

    let entries = store.entries().unwrap();
    assert_eq!(entries[0].sequence, SequenceNumber(1));
    assert_eq!(entries[1].sequence, SequenceNumber(2));
    assert_eq!(entries[0].record.task_id, "T-1");
}

#[test]
fn test_jsonl_reopen_resumes_numbering() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("audit.jsonl");

    classify_into(Arc::new(JsonlAuditStore::open(&path).unwrap()), &[("T-1", "gas leak")]);
    classify_into(Arc::new(JsonlAuditStore::open(&path).unwrap()), &[("T-2", "minor spill")]);

    let store = JsonlAuditStore::open(&path).unwrap();
    let sequences: Vec<u64> = store.entries().unwrap().iter().map(|e| e.sequence.0).collect();
    assert_eq!(sequences, vec![1, 2]);
}

#[test]
fn test_jsonl_recovers_from_torn_last_line() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("audit.jsonl");
    classify_into(Arc::new(JsonlAuditStore::open(&path).unwrap()), &[("T-1", "gas leak")]);

    // Crash mid-write: no trailing newline.
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("{\"sequence\":2,\"task_");
    fs::write(&path, content).unwrap();

    let store = Arc::new(JsonlAuditStore::open(&path).unwrap());
    assert_eq!(store.entries().unwrap().len(), 1);
    classify_into(store.clone(), &[("T-2", "minor spill")]);

    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].sequence, SequenceNumber(2));
    assert_eq!(entries[1].record.task_id, "T-2");
    assert!(fs::read_to_string(&path).unwrap().ends_with('\n'));
}

#[test]
fn test_jsonl_lookup_by_task_and_sequence() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonlAuditStore::open(temp.path().join("audit.jsonl")).unwrap());
    classify_into(store.clone(), &[("T-1", "gas leak"), ("T-2", "stack pallets"), ("T-1", "gas leak")]);

    assert_eq!(store.entries_for_task("T-1").unwrap().len(), 2);
    assert_eq!(store.get(SequenceNumber(2)).unwrap().unwrap().record.task_id, "T-2");
    assert!(store.get(SequenceNumber(9)).unwrap().is_none());
}

#[test]
fn test_unavailable_store_reports_not_durable() {
    let engine = engine(
        Arc::new(FixedModel::confident_low()),
        Arc::new(UnavailableAuditStore::new("read-only filesystem")),
    );

    let c = engine.classify(&RecordBuilder::new("gas leak").build()).unwrap();
    assert!(
        matches!(c.audit, AuditStatus::NotDurable { ref reason } if reason.contains("read-only"))
    );
}

#[test]
fn test_in_memory_filter_and_summary() {
    let store = Arc::new(InMemoryAuditStore::new());
    classify_into(
        store.clone(),
        &[("T-1", "gas leak"), ("T-2", "stack pallets"), ("T-3", "minor spill")],
    );

    let entries = store.entries().unwrap();
    let overrides = AuditFilter {
        task_id: None,
        overrides_only: true,
    }
    .apply(entries.clone());
    assert_eq!(overrides.len(), 2);

    let summary = summarize(&entries);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.overrides.len(), 2);
    assert_eq!(summary.by_rule.get("SR-GAS"), Some(&1));
    assert_eq!(summary.model_unavailable, 0);
}
