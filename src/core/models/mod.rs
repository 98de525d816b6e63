//! Domain models for the triage engine
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`TaskRecord`] - the raw report from the floor
//! - [`FeatureVector`] - its fixed-shape representation
//! - [`RuleTable`] / [`SafetyRule`] - declarative safety policy
//! - [`SafetyVerdict`] - what the rules decided
//! - [`ModelSuggestion`] / [`TaskSuggestion`] - opinion vs. decision
//! - [`AuditEntry`] - the permanent record of a decision

mod audit;
mod features;
mod priority;
mod rule;
mod shift;
mod suggestion;
mod task_record;
mod verdict;

pub use audit::{
    AuditEntry, AuditLevel, AuditRecord, AuditStatus, Classification, ModelOutcome,
    SequenceNumber,
};
pub use features::{EXTRACTOR_VERSION, FeatureSummary, FeatureVector, RecordContext, Vocabulary};
pub use priority::{DueDatePolicy, Priority};
pub use rule::{OverrideSpec, RulePredicate, RuleTable, SafetyRule};
pub use shift::{ShiftSchedule, ShiftWindow};
pub use suggestion::{FieldConfidence, ModelSuggestion, SuggestionSource, TaskSuggestion};
pub use task_record::{TaskRecord, generate_task_id};
pub use verdict::{SafetyOverride, SafetyVerdict};
