//! Concurrent classification against shared audit stores

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use floortriage::adapters::audit::{InMemoryAuditStore, JsonlAuditStore};
use floortriage::core::models::{AuditStatus, SequenceNumber};
use floortriage::core::ports::AuditStore;
use tempfile::TempDir;

use crate::common::fixtures::{RecordBuilder, engine};
use crate::common::mocks::FixedModel;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

/// Classify from many threads at once, returning every assigned sequence
fn hammer(store: Arc<dyn AuditStore>) -> Vec<SequenceNumber> {
    let engine = engine(Arc::new(FixedModel::confident_low()), store);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let engine = &engine;
                scope.spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| {
                            let description = if i % 3 == 0 { "gas leak" } else { "stack pallets" };
                            let record =
                                RecordBuilder::new(description).id(&format!("T-{t}-{i}")).build();
                            match engine.classify(&record).unwrap().audit {
                                AuditStatus::Durable { sequence } => sequence,
                                AuditStatus::NotDurable { reason } => panic!("not durable: {reason}"),
                            }
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    })
}

fn assert_log_is_sequenced(store: &dyn AuditStore, assigned: &[SequenceNumber]) {
    let total = THREADS * PER_THREAD;

    let unique: BTreeSet<_> = assigned.iter().copied().collect();
    assert_eq!(unique.len(), total, "sequence numbers handed out twice");

    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), total, "expected exactly one entry per call");
    assert!(entries.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(entries.first().unwrap().sequence, SequenceNumber::FIRST);

    let task_ids: BTreeSet<_> = entries.iter().map(|e| e.record.task_id.clone()).collect();
    assert_eq!(task_ids.len(), total);
}

#[test]
fn test_concurrent_in_memory_appends() {
    let store = Arc::new(InMemoryAuditStore::new());
    let assigned = hammer(store.clone());
    assert_log_is_sequenced(store.as_ref(), &assigned);
}

#[test]
fn test_concurrent_jsonl_appends() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonlAuditStore::open(temp.path().join("audit.jsonl")).unwrap());
    let assigned = hammer(store.clone());
    assert_log_is_sequenced(store.as_ref(), &assigned);

    let reopened = JsonlAuditStore::open(store.path()).unwrap();
    assert_eq!(reopened.entries().unwrap().len(), THREADS * PER_THREAD);
}
