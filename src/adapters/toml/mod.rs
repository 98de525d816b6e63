//! TOML-based safety rule tables
//!
//! - [`parser`] - Read, deserialize and validate rules.toml files

pub mod parser;

pub use parser::{
    EMBEDDED_RULES, RuleEntry, RuleTableFile, embedded_rule_table, load_rule_table,
    parse_rule_table,
};
