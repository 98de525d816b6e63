//! TOML parser for safety rule tables
//!
//! Handles reading and deserializing `rules.toml` files into a validated
//! [`RuleTable`].

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::core::error::RuleTableError;
use crate::core::models::{
    DueDatePolicy, OverrideSpec, Priority, RulePredicate, RuleTable, SafetyRule,
};

/// The rule table shipped inside the binary
pub const EMBEDDED_RULES: &str = include_str!("../../../assets/rules.toml");

/// A rules.toml file structure
#[derive(Debug, Deserialize)]
pub struct RuleTableFile {
    /// Table version, recorded with every audit entry
    #[serde(default)]
    pub version: String,

    /// Rules in evaluation order
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

/// A rule entry in rules.toml
#[derive(Debug, Deserialize)]
pub struct RuleEntry {
    /// Stable rule id
    #[serde(default)]
    pub id: String,

    /// Short name (defaults to the id)
    #[serde(default)]
    pub name: Option<String>,

    /// Why the rule exists
    #[serde(default)]
    pub reason: String,

    /// Fires when any of these keywords appear
    #[serde(default)]
    pub keywords_any: Vec<String>,

    /// Fires only when all of these keywords appear
    #[serde(default)]
    pub keywords_all: Vec<String>,

    /// Fires when any of these tags is set
    #[serde(default)]
    pub tags_any: Vec<String>,

    /// Forced category
    #[serde(default)]
    pub category: String,

    /// Forced priority: low, normal, high, critical
    pub priority: String,

    /// Forced due date: immediate, `end_of_shift` or `<n>d`
    pub due: String,
}

impl RuleEntry {
    fn into_rule(self) -> Result<SafetyRule, RuleTableError> {
        let invalid = |message: String| RuleTableError::InvalidField {
            rule_id: self.id.clone(),
            message,
        };
        let priority: Priority = self.priority.parse().map_err(invalid)?;
        let due: DueDatePolicy = self.due.parse().map_err(invalid)?;

        Ok(SafetyRule {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            reason: self.reason,
            when: RulePredicate {
                keywords_any: self.keywords_any,
                keywords_all: self.keywords_all,
                tags_any: self.tags_any,
            },
            then: OverrideSpec {
                category: self.category,
                priority,
                due,
            },
        })
    }
}

impl RuleTableFile {
    /// Validate into a [`RuleTable`]
    ///
    /// # Errors
    ///
    /// Returns the first field or table validation failure.
    pub fn into_table(self) -> Result<RuleTable, RuleTableError> {
        let rules =
            self.rules.into_iter().map(RuleEntry::into_rule).collect::<Result<Vec<_>, _>>()?;
        RuleTable::new(self.version, rules)
    }
}

/// Parse a rule table from TOML text
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or the table is invalid.
pub fn parse_rule_table(content: &str) -> anyhow::Result<RuleTable> {
    let file: RuleTableFile = toml::from_str(content)?;
    Ok(file.into_table()?)
}

/// Load a rule table from a rules.toml file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_rule_table(path: &Path) -> anyhow::Result<RuleTable> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_rule_table(&content).with_context(|| format!("invalid rule table {}", path.display()))
}

/// The rule table shipped inside the binary
///
/// # Errors
///
/// Only fails if the embedded asset is broken, which the test suite guards.
pub fn embedded_rule_table() -> anyhow::Result<RuleTable> {
    parse_rule_table(EMBEDDED_RULES).context("embedded rule table")
}
