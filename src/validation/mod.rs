//! Validation Engine
//!
//! Orchestration and rule matching, separated from loading and output.

pub mod engine;

pub use engine::{Diagnostic, LintResult, Linter, TokenOutcome};
