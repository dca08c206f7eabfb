//! Branch Name Linter
//!
//! Validates a branch name against an ordered, positional set of named
//! parameter rules and renders parameterized diagnostics.
//!
//! This library provides:
//! - The rule set model with fail-fast construction checks
//! - The rule matcher and validation orchestrator
//! - Placeholder-based message templating
//! - Console reporting and configuration management

pub mod config;
pub mod git;
pub mod output;
pub mod rules;
pub mod template;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use output::Reporter;
pub use rules::{ConfigError, RuleSet, Severity};
pub use validation::{Diagnostic, LintResult, Linter};
