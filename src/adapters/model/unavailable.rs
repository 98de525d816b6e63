//! Model stand-in for a missing or broken artifact

use crate::core::error::ModelUnavailableError;
use crate::core::models::{FeatureVector, ModelSuggestion};
use crate::core::ports::SuggestionModel;

/// Version recorded in audit entries when no model is loaded
pub const UNAVAILABLE_MODEL_VERSION: &str = "unavailable";

/// A model that never has an opinion
///
/// Every task falls through to a safety override or the configured defaults.
#[derive(Debug, Clone)]
pub struct UnavailableModel {
    reason: String,
}

impl UnavailableModel {
    /// Create a stand-in carrying the load failure
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the artifact could not be loaded
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl SuggestionModel for UnavailableModel {
    fn version(&self) -> String {
        UNAVAILABLE_MODEL_VERSION.to_string()
    }

    fn predict(&self, _features: &FeatureVector) -> Result<ModelSuggestion, ModelUnavailableError> {
        Err(ModelUnavailableError::ArtifactUnavailable {
            reason: self.reason.clone(),
        })
    }
}
