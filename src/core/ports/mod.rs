//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the arbitration core and the
//! things it does not own: the suggestion model and the audit store.
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core domain logic depends only on these traits, never on concrete
//! implementations. This enables:
//!
//! - **Testability**: Fixture models and stores in unit tests
//! - **Flexibility**: Swap in a learned classifier without touching arbitration
//! - **Clarity**: Clear boundaries between layers

mod audit_store;
mod suggestion_model;

pub use audit_store::AuditStore;
pub use suggestion_model::SuggestionModel;

#[cfg(test)]
pub use audit_store::MockAuditStore;
#[cfg(test)]
pub use suggestion_model::MockSuggestionModel;
