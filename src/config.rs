//! Configuration management
//!
//! Settings live in `triage.toml`. Lookup order: an explicit `--config`
//! path, `./triage.toml`, `~/.config/floortriage/triage.toml`, then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::adapters::audit::{JsonlAuditStore, UnavailableAuditStore};
use crate::adapters::model::{KeywordModel, UnavailableModel};
use crate::adapters::toml::{embedded_rule_table, load_rule_table};
use crate::core::models::{Priority, RuleTable, ShiftSchedule, ShiftWindow};
use crate::core::ports::{AuditStore, SuggestionModel};
use crate::core::services::{ArbitrationEngine, ArbitrationSettings};
use crate::paths;

/// The configuration `init` writes
pub const DEFAULT_CONFIG: &str = include_str!("../assets/triage.toml");

/// floortriage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Arbitration settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Artifact and log locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Shift windows (empty uses morning/afternoon/night)
    #[serde(default, rename = "shift")]
    pub shifts: Vec<ShiftWindow>,

    /// Directory relative paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,

    /// File this configuration was read from
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// `[engine]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Category when the model has no usable opinion
    pub default_category: String,
    /// Priority when the model has no usable opinion
    pub default_priority: Priority,
    /// Due offset when the model has no usable opinion
    pub default_due_date_offset_days: u32,
    /// Fail classification when the audit write fails
    pub audit_write_blocking: bool,
    /// Model suggestions below this overall confidence use the defaults
    pub min_confidence_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let settings = ArbitrationSettings::default();
        Self {
            default_category: settings.default_category,
            default_priority: settings.default_priority,
            default_due_date_offset_days: settings.default_due_date_offset_days,
            audit_write_blocking: settings.audit_write_blocking,
            min_confidence_threshold: settings.min_confidence_threshold,
        }
    }
}

/// `[paths]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Rule table; unset uses the embedded table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
    /// Model artifact; unset uses the embedded model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    /// Audit log
    pub audit_log: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            rules: None,
            model: None,
            audit_log: paths::default_audit_log(),
        }
    }
}

impl Config {
    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is out of range.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Find and load the configuration in force
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or a found file is invalid.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            return Self::load(path);
        }
        for candidate in [paths::local_config(), paths::global_config()] {
            if candidate.is_file() {
                debug!("using config {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// File this configuration came from (None for built-in defaults)
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn validate(&self) -> anyhow::Result<()> {
        let threshold = self.engine.min_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("engine.min_confidence_threshold must be between 0 and 1, got {threshold}");
        }
        if self.engine.default_category.trim().is_empty() {
            bail!("engine.default_category must not be empty");
        }
        for shift in &self.shifts {
            if shift.name.trim().is_empty() {
                bail!("every [[shift]] needs a name");
            }
            if shift.start_hour >= 24 || shift.end_hour > 48 || shift.end_hour == shift.start_hour
            {
                bail!(
                    "shift {}: hours {}..{} are not a valid window",
                    shift.name,
                    shift.start_hour,
                    shift.end_hour
                );
            }
        }
        Ok(())
    }

    /// Resolve a path against the config file's directory
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }

    /// Resolved rule table path, if configured
    #[must_use]
    pub fn rules_path(&self) -> Option<PathBuf> {
        self.paths.rules.as_deref().map(|p| self.resolve(p))
    }

    /// Resolved model artifact path, if configured
    #[must_use]
    pub fn model_path(&self) -> Option<PathBuf> {
        self.paths.model.as_deref().map(|p| self.resolve(p))
    }

    /// Resolved audit log path
    #[must_use]
    pub fn audit_log_path(&self) -> PathBuf {
        self.resolve(&self.paths.audit_log)
    }

    /// Shift schedule in force
    #[must_use]
    pub fn shift_schedule(&self) -> ShiftSchedule {
        ShiftSchedule::new(self.shifts.clone())
    }

    /// Arbitration settings in force
    #[must_use]
    pub fn settings(&self) -> ArbitrationSettings {
        ArbitrationSettings {
            default_category: self.engine.default_category.trim().to_lowercase(),
            default_priority: self.engine.default_priority,
            default_due_date_offset_days: self.engine.default_due_date_offset_days,
            audit_write_blocking: self.engine.audit_write_blocking,
            min_confidence_threshold: self.engine.min_confidence_threshold,
            shifts: self.shift_schedule(),
        }
    }

    /// Load the rule table in force
    ///
    /// A configured file that does not exist falls back to the embedded
    /// table with a warning. A file that exists but is invalid is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rule table is invalid.
    pub fn load_rules(&self) -> anyhow::Result<RuleTable> {
        match self.rules_path() {
            Some(path) if path.exists() => load_rule_table(&path),
            Some(path) => {
                warn!("rule table {} not found, using embedded rules", path.display());
                embedded_rule_table()
            },
            None => embedded_rule_table(),
        }
    }

    /// Load the suggestion model in force
    ///
    /// Never fails: an artifact that cannot be loaded yields a model that is
    /// always unavailable, so safety rules and defaults keep working.
    #[must_use]
    pub fn load_model(&self) -> Arc<dyn SuggestionModel> {
        let loaded = match self.model_path() {
            Some(path) => KeywordModel::load(&path),
            None => KeywordModel::embedded(),
        };
        match loaded {
            Ok(model) => Arc::new(model),
            Err(err) => {
                warn!("model unavailable: {err:#}");
                Arc::new(UnavailableModel::new(format!("{err:#}")))
            },
        }
    }

    /// Open the audit log in force
    ///
    /// A log that cannot be opened yields a store that rejects every write,
    /// so suggestions come back not durable instead of not at all.
    #[must_use]
    pub fn open_audit_store(&self) -> Arc<dyn AuditStore> {
        let path = self.audit_log_path();
        match JsonlAuditStore::open(&path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!("audit log {} unavailable: {err:#}", path.display());
                Arc::new(UnavailableAuditStore::new(format!("{err:#}")))
            },
        }
    }

    /// Assemble the arbitration engine this configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rule table is invalid.
    pub fn build_engine(&self) -> anyhow::Result<ArbitrationEngine> {
        let rules = Arc::new(self.load_rules()?);
        Ok(ArbitrationEngine::new(
            rules,
            self.load_model(),
            self.open_audit_store(),
            self.settings(),
        ))
    }
}
