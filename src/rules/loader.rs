//! Rule file loading.
//!
//! Discovery order: explicit path, then rule files in the working
//! directory, then the user config directory, then the embedded default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::schema::{RuleFile, RuleSet};

const EMBEDDED_DEFAULT: &str = include_str!("../../resources/rules/default.branchlint.toml");

const CANDIDATES: &[&str] = &[
    "branchlint.toml",
    ".branchlint.toml",
    "branchlint.json",
    ".branchlint.json",
];

/// Resolve the rule set for this run.
pub fn load(explicit: Option<&Path>) -> Result<RuleSet> {
    if let Some(path) = explicit {
        return load_file(path);
    }
    for name in CANDIDATES {
        let path = PathBuf::from(name);
        if path.is_file() {
            return load_file(&path);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("branch-lint").join("branchlint.toml");
        if path.is_file() {
            return load_file(&path);
        }
    }
    Ok(embedded_default())
}

/// Parse and validate one rule file. Format is chosen by extension:
/// `.json` is JSON, anything else is TOML.
pub fn load_file(path: &Path) -> Result<RuleSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file {}", path.display()))?;
    let file: RuleFile = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON rule file {}", path.display()))?
    } else {
        toml::from_str(&raw)
            .with_context(|| format!("invalid TOML rule file {}", path.display()))?
    };
    RuleSet::try_from(file).with_context(|| format!("invalid rule set in {}", path.display()))
}

/// The embedded stock rule set, with a minimal fallback if the embedded
/// file ever fails to parse.
pub fn embedded_default() -> RuleSet {
    match toml::from_str::<RuleFile>(EMBEDDED_DEFAULT) {
        Ok(file) => match RuleSet::try_from(file) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("Embedded default rules are invalid: {e}. Using minimal fallback.");
                RuleSet::minimal_fallback()
            }
        },
        Err(e) => {
            log::warn!("Failed to parse embedded default rules: {e}. Using minimal fallback.");
            RuleSet::minimal_fallback()
        }
    }
}
