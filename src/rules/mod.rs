//! Rule Set Model
//!
//! Schema, construction-time validation, and rule file loading.

pub mod loader;
pub mod schema;

pub use schema::{
    ConfigError, ERROR_CODE, MessageTemplate, Messages, Position, Rule, RuleDef, RuleFile,
    RuleMessages, RuleSet, SUCCESS_CODE, Severity,
};
