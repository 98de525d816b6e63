//! Arbitration engine - the classify pipeline
//!
//! extract → safety rules → model → merge → audit. Safety overrides are
//! absolute: when any rule fires, the model's opinion is recorded in the audit
//! entry and nowhere else.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};

use crate::core::error::{ModelUnavailableError, TriageError};
use crate::core::models::{
    AuditLevel, AuditRecord, AuditStatus, Classification, FeatureVector, ModelOutcome, ModelSuggestion,
    Priority, RuleTable, SafetyVerdict, ShiftSchedule, TaskRecord, TaskSuggestion, Vocabulary,
};
use crate::core::ports::{AuditStore, SuggestionModel};

use super::due_date::{offset_due_date, resolve_due_date};
use super::extractor::FeatureExtractor;
use super::safety::SafetyRuleEngine;

/// Tunable arbitration behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrationSettings {
    /// Category used when the model has no usable opinion
    pub default_category: String,
    /// Priority used when the model has no usable opinion
    pub default_priority: Priority,
    /// Due-date offset used when the model has no usable opinion
    pub default_due_date_offset_days: u32,
    /// Fail `classify` when the audit write fails
    pub audit_write_blocking: bool,
    /// Model suggestions below this overall confidence fall back to defaults
    pub min_confidence_threshold: f64,
    /// Shift schedule for shift naming and `end_of_shift` due dates
    pub shifts: ShiftSchedule,
}

impl Default for ArbitrationSettings {
    fn default() -> Self {
        Self {
            default_category: "uncategorized".to_string(),
            default_priority: Priority::Normal,
            default_due_date_offset_days: 3,
            audit_write_blocking: false,
            min_confidence_threshold: 0.0,
            shifts: ShiftSchedule::default(),
        }
    }
}

/// Turns task records into audited suggestions
///
/// Shares nothing mutable between calls; the audit store is the only
/// serialization point, so one engine can serve many threads.
pub struct ArbitrationEngine {
    extractor: FeatureExtractor,
    safety: SafetyRuleEngine,
    model: Arc<dyn SuggestionModel>,
    model_version: String,
    audit: Arc<dyn AuditStore>,
    settings: ArbitrationSettings,
}

impl std::fmt::Debug for ArbitrationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationEngine")
            .field("rule_table", &self.safety.table().version())
            .field("model", &self.model_version)
            .field("vocabulary", &self.extractor.vocabulary().len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ArbitrationEngine {
    /// Wire up an engine from loaded collaborators
    ///
    /// The extractor vocabulary is the built-in lexicon plus every keyword
    /// the rule table and the model refer to.
    #[must_use]
    pub fn new(
        rules: Arc<RuleTable>,
        model: Arc<dyn SuggestionModel>,
        audit: Arc<dyn AuditStore>,
        settings: ArbitrationSettings,
    ) -> Self {
        let mut vocabulary = Vocabulary::builtin();
        vocabulary.extend(rules.referenced_terms());
        vocabulary.extend(model.vocabulary());

        let model_version = model.version();
        debug!(
            "arbitration engine: rules {} ({} rules), model {}, vocabulary {} terms",
            rules.version(),
            rules.rules().len(),
            model_version,
            vocabulary.len()
        );

        Self {
            extractor: FeatureExtractor::new(vocabulary, settings.shifts.clone()),
            safety: SafetyRuleEngine::new(rules),
            model,
            model_version,
            audit,
            settings,
        }
    }

    /// Settings in force
    #[must_use]
    pub const fn settings(&self) -> &ArbitrationSettings {
        &self.settings
    }

    /// Rule table in force
    #[must_use]
    pub fn rule_table(&self) -> &RuleTable {
        self.safety.table()
    }

    /// Version of the model in force
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Classify one task record
    ///
    /// # Errors
    ///
    /// - [`TriageError::MalformedRecord`] when required fields are missing
    /// - [`TriageError::FeatureShape`] on an internal feature-shape defect
    /// - [`TriageError::AuditWrite`] when the audit write fails and
    ///   `audit_write_blocking` is set (otherwise the failure is reported
    ///   through [`AuditStatus::NotDurable`])
    pub fn classify(&self, record: &TaskRecord) -> Result<Classification, TriageError> {
        let features = self.extractor.extract(record)?;
        let task_id = record.id.trim();
        debug!("{task_id}: flags {:?}, oov {}", features.flags(), features.oov_count());

        let verdict = self.safety.evaluate(&features)?;
        let model = self.consult_model(task_id, &features);
        let suggestion = self.merge(task_id, &features, &verdict, &model);

        let level = AuditLevel::assess(&verdict, &model, &suggestion);
        let audit_record = AuditRecord {
            task_id: task_id.to_string(),
            recorded_at: Utc::now(),
            rule_table_version: self.safety.table().version().to_string(),
            model_version: self.model_version.clone(),
            level,
            features: features.summary(),
            verdict,
            model,
            suggestion: suggestion.clone(),
        };
        let audit = self.record(task_id, audit_record)?;

        Ok(Classification { suggestion, audit })
    }

    /// Classify several records independently
    ///
    /// One failing record does not stop the rest.
    pub fn classify_all(&self, records: &[TaskRecord]) -> Vec<Result<Classification, TriageError>> {
        records.iter().map(|r| self.classify(r)).collect()
    }

    fn consult_model(&self, task_id: &str, features: &FeatureVector) -> ModelOutcome {
        match self.model.predict(features).and_then(validate_suggestion) {
            Ok(suggestion) => ModelOutcome::Suggested { suggestion },
            Err(err) => {
                warn!("{task_id}: no model opinion, using defaults ({err})");
                ModelOutcome::Unavailable {
                    reason: err.to_string(),
                }
            },
        }
    }

    fn merge(
        &self,
        task_id: &str,
        features: &FeatureVector,
        verdict: &SafetyVerdict,
        model: &ModelOutcome,
    ) -> TaskSuggestion {
        let reported_at = features.reported_at();

        if let SafetyVerdict::Override(o) = verdict {
            info!(
                "{task_id}: safety override by {} ({}): {} / {}",
                o.triggering_rule_id, o.reason, o.category, o.priority
            );
            return TaskSuggestion::from_override(
                task_id,
                &o.category,
                o.priority,
                resolve_due_date(o.due_date_policy, reported_at, &self.settings.shifts),
                &o.triggering_rule_id,
            );
        }

        if let Some(suggestion) = model.suggestion() {
            let confidence = suggestion.confidence.overall();
            if confidence >= self.settings.min_confidence_threshold {
                return TaskSuggestion::from_model(
                    task_id,
                    suggestion,
                    offset_due_date(reported_at, suggestion.due_date_offset_days),
                );
            }
            info!(
                "{task_id}: model confidence {confidence:.2} below threshold {:.2}, using defaults",
                self.settings.min_confidence_threshold
            );
        }

        TaskSuggestion::from_default(
            task_id,
            &self.settings.default_category,
            self.settings.default_priority,
            offset_due_date(reported_at, self.settings.default_due_date_offset_days),
        )
    }

    fn record(&self, task_id: &str, record: AuditRecord) -> Result<AuditStatus, TriageError> {
        match self.audit.append(record) {
            Ok(sequence) => {
                debug!("{task_id}: audited as {sequence}");
                Ok(AuditStatus::Durable { sequence })
            },
            Err(err) if self.settings.audit_write_blocking => {
                error!("{task_id}: audit write failed, rejecting classification: {err}");
                Err(TriageError::AuditWrite(err))
            },
            Err(err) => {
                error!("{task_id}: audit write failed, suggestion is not durable: {err}");
                Ok(AuditStatus::NotDurable {
                    reason: err.to_string(),
                })
            },
        }
    }
}

/// Reject model output that breaks the suggestion contract
fn validate_suggestion(suggestion: ModelSuggestion) -> Result<ModelSuggestion, ModelUnavailableError> {
    if suggestion.category.trim().is_empty() {
        return Err(ModelUnavailableError::InvalidOutput {
            reason: "empty category".to_string(),
        });
    }
    if !suggestion.confidence.is_valid() {
        return Err(ModelUnavailableError::InvalidOutput {
            reason: "confidence outside [0, 1]".to_string(),
        });
    }
    Ok(suggestion)
}
