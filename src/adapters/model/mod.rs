//! Suggestion model implementations
//!
//! - [`keyword`] - Keyword-frequency scorer loaded from a TOML artifact
//! - [`unavailable`] - Stand-in when no artifact could be loaded

pub mod keyword;
pub mod unavailable;

pub use keyword::{
    CategoryEntry, DueOffsets, EMBEDDED_MODEL, KeywordModel, ModelArtifact, PriorityScoring,
};
pub use unavailable::UnavailableModel;
