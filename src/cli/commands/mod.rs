//! Command implementations

mod audit;
mod classify;
mod init;
mod rules;

pub use audit::audit;
pub use classify::{RecordSource, classify};
pub use init::init;
pub use rules::rules;
