//! Core domain logic for floortriage
//!
//! This module contains pure business logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (TaskRecord, FeatureVector, RuleTable, suggestions, audit)
//! - `services/` - Extraction, safety evaluation and arbitration
//! - `ports/` - Trait definitions for the suggestion model and audit store
//! - `error` - Error taxonomy
//! - `text` - Tokenization shared by everything that compares keywords

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
pub mod text;
