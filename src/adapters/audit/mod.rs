//! Audit store implementations
//!
//! - [`jsonl`] - Append-only JSON Lines file, the production log
//! - [`memory`] - In-process store for tests and dry runs
//! - [`unavailable`] - Stand-in when the log cannot be opened

pub mod jsonl;
pub mod memory;
pub mod unavailable;

pub use jsonl::JsonlAuditStore;
pub use memory::InMemoryAuditStore;
pub use unavailable::UnavailableAuditStore;
