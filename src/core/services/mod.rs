//! Business logic services
//!
//! Pure orchestration logic that operates on domain models. The only I/O
//! happens behind the ports the arbitration engine is handed.
//!
//! - [`extractor`] - Task record → feature vector
//! - [`safety`] - Rule table evaluation
//! - [`due_date`] - Policy → absolute due date
//! - [`arbiter`] - The classify pipeline
//! - [`review`] - Audit log filtering and summaries

pub mod arbiter;
pub mod due_date;
pub mod extractor;
pub mod review;
pub mod safety;

pub use arbiter::{ArbitrationEngine, ArbitrationSettings};
pub use due_date::{offset_due_date, resolve_due_date};
pub use extractor::FeatureExtractor;
pub use review::{AuditFilter, AuditSummary, OverrideRecord, summarize};
pub use safety::SafetyRuleEngine;
