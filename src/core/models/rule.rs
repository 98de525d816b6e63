//! Safety rule model
//!
//! A rule says: "when the report looks like this, the task is a safety task
//! with this priority and due date, no matter what the model thinks."
//! Rule tables are data, loaded from TOML and reviewed like any other policy.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::{DueDatePolicy, FeatureVector, Priority};
use crate::core::error::RuleTableError;
use crate::core::text::{normalize_tag, normalize_term};

/// Conditions a rule checks
///
/// Every non-empty clause must hold; at least one clause must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePredicate {
    /// Any of these keyword flags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords_any: Vec<String>,
    /// All of these keyword flags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords_all: Vec<String>,
    /// Any of these structured tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags_any: Vec<String>,
}

impl RulePredicate {
    /// Whether no clause is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords_any.is_empty() && self.keywords_all.is_empty() && self.tags_any.is_empty()
    }

    /// Evaluate against a feature vector
    #[must_use]
    pub fn matches(&self, features: &FeatureVector) -> bool {
        if self.is_empty() {
            return false;
        }
        let flags = features.flags();
        let any_ok =
            self.keywords_any.is_empty() || self.keywords_any.iter().any(|k| flags.contains(k));
        let all_ok = self.keywords_all.iter().all(|k| flags.contains(k));
        let tags_ok =
            self.tags_any.is_empty() || self.tags_any.iter().any(|t| features.tags().contains(t));
        any_ok && all_ok && tags_ok
    }

    fn normalized(self) -> Self {
        let norm_terms = |terms: Vec<String>| -> Vec<String> {
            terms.iter().map(|t| normalize_term(t)).filter(|t| !t.is_empty()).collect()
        };
        Self {
            keywords_any: norm_terms(self.keywords_any),
            keywords_all: norm_terms(self.keywords_all),
            tags_any: self
                .tags_any
                .iter()
                .map(|t| normalize_tag(t))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// What a rule forces when it fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSpec {
    /// Forced category
    pub category: String,
    /// Forced priority
    pub priority: Priority,
    /// Forced due-date policy
    pub due: DueDatePolicy,
}

/// One entry in the safety rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRule {
    /// Stable identifier, recorded in suggestions and audit entries
    pub id: String,
    /// Short human-readable name
    pub name: String,
    /// Why this rule exists
    pub reason: String,
    /// When it fires
    pub when: RulePredicate,
    /// What it forces
    pub then: OverrideSpec,
}

impl SafetyRule {
    /// Whether this rule fires for a feature vector
    #[must_use]
    pub fn matches(&self, features: &FeatureVector) -> bool {
        self.when.matches(features)
    }
}

/// An ordered, versioned, validated set of safety rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTable {
    version: String,
    rules: Vec<SafetyRule>,
}

impl RuleTable {
    /// Validate and normalize a rule table
    ///
    /// # Errors
    ///
    /// Returns the first validation failure: missing version, blank or
    /// duplicate ids, rules without conditions or without a category.
    pub fn new(version: impl Into<String>, rules: Vec<SafetyRule>) -> Result<Self, RuleTableError> {
        let version = version.into().trim().to_string();
        if version.is_empty() {
            return Err(RuleTableError::MissingVersion);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());
        for (i, mut rule) in rules.into_iter().enumerate() {
            rule.id = rule.id.trim().to_string();
            if rule.id.is_empty() {
                return Err(RuleTableError::MissingRuleId { position: i + 1 });
            }
            if !seen.insert(rule.id.clone()) {
                return Err(RuleTableError::DuplicateRuleId(rule.id));
            }
            rule.when = rule.when.normalized();
            if rule.when.is_empty() {
                return Err(RuleTableError::EmptyPredicate(rule.id));
            }
            rule.then.category = rule.then.category.trim().to_lowercase();
            if rule.then.category.is_empty() {
                return Err(RuleTableError::EmptyCategory(rule.id));
            }
            normalized.push(rule);
        }

        Ok(Self {
            version,
            rules: normalized,
        })
    }

    /// Version identifier, recorded with every audit entry
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rules in table order
    #[must_use]
    pub fn rules(&self) -> &[SafetyRule] {
        &self.rules
    }

    /// Look up a rule by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SafetyRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Every keyword any rule refers to
    ///
    /// The extractor must detect these, so they are merged into its vocabulary.
    #[must_use]
    pub fn referenced_terms(&self) -> BTreeSet<String> {
        self.rules
            .iter()
            .flat_map(|r| r.when.keywords_any.iter().chain(&r.when.keywords_all))
            .cloned()
            .collect()
    }
}
