//! Common test utilities shared across test types
//!
//! - `fixtures.rs` - Records, rule tables and engine builders
//! - `mocks.rs` - Hand-written port implementations with fixed behavior

pub mod fixtures;
pub mod mocks;
