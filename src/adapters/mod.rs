//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `toml/` - rules.toml parsing and validation
//! - `model/` - Suggestion models loaded from artifacts
//! - `audit/` - Audit log storage

pub mod audit;
pub mod model;
pub mod toml;
