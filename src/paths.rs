//! Centralized path definitions for floortriage
//!
//! This module provides a single source of truth for the filesystem paths
//! floortriage reads and writes.
//!
//! ## Storage Layout
//!
//! ### Per-Site (working directory)
//!
//! ```text
//! site/
//! ├── triage.toml              # Engine settings, shifts, artifact paths
//! ├── rules.toml               # Safety rule table
//! ├── model.toml               # Keyword model artifact
//! └── .triage/
//!     └── audit.jsonl          # Append-only audit log
//! ```
//!
//! ### Global (User-Level)
//!
//! ```text
//! ~/.config/floortriage/
//! └── triage.toml              # Used when the working directory has none
//! ```
//!
//! Artifact paths inside a `triage.toml` are relative to that file.

use std::path::PathBuf;

/// Configuration filename
pub const CONFIG_FILE: &str = "triage.toml";

/// Rule table filename written by `init`
pub const RULES_FILE: &str = "rules.toml";

/// Model artifact filename written by `init`
pub const MODEL_FILE: &str = "model.toml";

/// Directory for local state
pub const STATE_DIR: &str = ".triage";

/// Audit log filename
const AUDIT_LOG_FILE: &str = "audit.jsonl";

/// Global config directory name
const GLOBAL_DIR: &str = "floortriage";

/// Get path to `triage.toml` in the working directory.
#[must_use]
pub fn local_config() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Default audit log location, relative to the config directory.
///
/// Returns `.triage/audit.jsonl`.
#[must_use]
pub fn default_audit_log() -> PathBuf {
    PathBuf::from(STATE_DIR).join(AUDIT_LOG_FILE)
}

/// Get the global floortriage directory.
///
/// Returns `~/.config/floortriage/` (or the platform equivalent).
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(GLOBAL_DIR)
}

/// Get the global config file path.
///
/// Returns `~/.config/floortriage/triage.toml`.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(CONFIG_FILE)
}
