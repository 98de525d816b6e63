//! Suggestion model port
//!
//! Defines the capability the arbitration engine needs from any classifier.

use super::super::error::ModelUnavailableError;
use super::super::models::{FeatureVector, ModelSuggestion};

/// A model that suggests category, priority and due-date offset
///
/// Implementations range from keyword heuristics to learned classifiers. The
/// arbitration engine depends on nothing but this trait, and never treats a
/// suggestion as authoritative.
#[cfg_attr(test, mockall::automock)]
pub trait SuggestionModel: Send + Sync {
    /// Version identifier of the loaded artifact
    fn version(&self) -> String;

    /// Suggest a classification for a feature vector
    ///
    /// Fails with [`ModelUnavailableError`] when the artifact is missing or
    /// prediction is impossible; the engine then falls back to its defaults.
    fn predict(&self, features: &FeatureVector) -> Result<ModelSuggestion, ModelUnavailableError>;

    /// Keywords the model reads
    ///
    /// Merged into the extractor's vocabulary so the model sees them as
    /// named counts rather than out-of-vocabulary noise.
    fn vocabulary(&self) -> Vec<String> {
        Vec::new()
    }
}
