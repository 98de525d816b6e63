//! Safety rule engine - evaluates the rule table against a feature vector
//!
//! Independent of any model artifact. Every rule is checked; when several
//! fire, the most restrictive outcome wins field by field.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;

use crate::core::error::FeatureShapeError;
use crate::core::models::{FeatureVector, RuleTable, SafetyOverride, SafetyRule, SafetyVerdict};

/// Evaluates a loaded [`RuleTable`]
#[derive(Debug, Clone)]
pub struct SafetyRuleEngine {
    table: Arc<RuleTable>,
    required_terms: Vec<String>,
}

impl SafetyRuleEngine {
    /// Create an engine over a rule table
    #[must_use]
    pub fn new(table: Arc<RuleTable>) -> Self {
        let required_terms = table.referenced_terms().into_iter().collect();
        Self {
            table,
            required_terms,
        }
    }

    /// The rule table in force
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Evaluate every rule and combine the matches
    ///
    /// # Errors
    ///
    /// Rejects a vector whose counts do not fit its vocabulary, or whose
    /// vocabulary is missing a rule keyword (the rule could never fire). Both
    /// are bugs in the caller, not operating conditions.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<SafetyVerdict, FeatureShapeError> {
        if !features.is_well_shaped() {
            return Err(FeatureShapeError::Dimension {
                expected: features.vocabulary().dimension(),
                actual: features.counts().len(),
            });
        }
        let vocabulary = features.vocabulary();
        if let Some(term) = self.required_terms.iter().find(|t| vocabulary.index_of(t).is_none()) {
            return Err(FeatureShapeError::MissingRuleTerm { term: term.clone() });
        }

        let matched: Vec<&SafetyRule> =
            self.table.rules().iter().filter(|rule| rule.matches(features)).collect();

        let Some(winner) = matched.iter().copied().reduce(|best, rule| {
            if is_stricter(rule, best) { rule } else { best }
        }) else {
            debug!("no safety rule matched (table {})", self.table.version());
            return Ok(SafetyVerdict::NoOverride);
        };

        let priority = matched.iter().map(|r| r.then.priority).max().unwrap_or(winner.then.priority);
        let due_date_policy =
            matched.iter().map(|r| r.then.due).fold(winner.then.due, |acc, due| acc.stricter(due));

        debug!(
            "safety rules matched: {:?}, triggering {}",
            matched.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            winner.id
        );

        Ok(SafetyVerdict::Override(SafetyOverride {
            category: winner.then.category.clone(),
            priority,
            due_date_policy,
            triggering_rule_id: winner.id.clone(),
            reason: winner.reason.clone(),
            matched_rule_ids: matched.iter().map(|r| r.id.clone()).collect(),
        }))
    }
}

/// Whether `candidate` is strictly more restrictive than `current`
///
/// Ties keep the earlier rule in table order.
fn is_stricter(candidate: &SafetyRule, current: &SafetyRule) -> bool {
    match candidate.then.priority.cmp(&current.then.priority) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            candidate.then.due.restrictiveness_cmp(current.then.due) == Ordering::Greater
        },
    }
}
