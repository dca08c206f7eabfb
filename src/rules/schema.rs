//! Rule Set Schema Types
//!
//! File schema (matches TOML/JSON rule files) plus the runtime `RuleSet`
//! with compiled patterns and construction-time validation.

use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Exit code for a passing branch name.
pub const SUCCESS_CODE: i32 = 0;
/// Exit code for a failing branch name.
pub const ERROR_CODE: i32 = 1;

/// Severity tag attached to every diagnostic and message template.
///
/// `App` is the top-level pass/fail wrapper scope and serializes as
/// `branchNameLint` for compatibility with existing rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Severity {
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "branchNameLint")]
    App,
}

impl Severity {
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Success => "SUCCESS",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::App => "branchNameLint",
        }
    }
}

/// A single diagnostic message template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageTemplate {
    pub severity: Severity,
    pub text: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    1
}

impl MessageTemplate {
    fn new(severity: Severity, text: &str) -> Self {
        Self {
            severity,
            text: text.to_string(),
            indent: default_indent(),
        }
    }
}

/// Token position(s) at which a rule may apply. Zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Single(usize),
    Multiple(Vec<usize>),
}

impl Position {
    pub fn contains(&self, index: usize) -> bool {
        match self {
            Position::Single(p) => *p == index,
            Position::Multiple(ps) => ps.contains(&index),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Position::Multiple(_))
    }

    /// Highest declared position, `None` for an empty list.
    pub fn max(&self) -> Option<usize> {
        match self {
            Position::Single(p) => Some(*p),
            Position::Multiple(ps) => ps.iter().copied().max(),
        }
    }

    /// One-based display form, `" || "`-joined when multiple.
    pub fn one_based(&self) -> String {
        match self {
            Position::Single(p) => (p + 1).to_string(),
            Position::Multiple(ps) => ps
                .iter()
                .map(|p| (p + 1).to_string())
                .collect::<Vec<_>>()
                .join(" || "),
        }
    }
}

/// Per-rule message overrides. Each falls back to the global default of
/// the same kind in [`Messages`] when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleMessages {
    pub not_allowed: Option<MessageTemplate>,
    pub suggestion: Option<MessageTemplate>,
    pub missing: Option<MessageTemplate>,
    pub regex: Option<MessageTemplate>,
    pub valid: Option<MessageTemplate>,
}

/// One named, positional validation rule as declared in a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleDef {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub position: Position,
    /// Literal allowed values; empty means the option check is not used.
    #[serde(default)]
    pub options: Vec<String>,
    /// Full-string pattern, anchored and case-insensitive at compile time.
    pub regex: Option<String>,
    /// Misspelled/alternate value to canonical replacement.
    #[serde(default)]
    pub suggestions: BTreeMap<String, String>,
    /// Example values shown in regex-failure hints.
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub messages: RuleMessages,
}

/// Global message templates, including the per-kind fallbacks used when a
/// rule declares no override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub lint_success: MessageTemplate,
    pub lint_error: MessageTemplate,
    pub branch_skipped: MessageTemplate,
    pub separator_required: MessageTemplate,
    pub branch_banned: MessageTemplate,
    pub branch_disallowed: MessageTemplate,
    pub params_missing: MessageTemplate,
    pub nth_param_not_valid: MessageTemplate,
    pub validating: MessageTemplate,
    pub valid: MessageTemplate,
    pub not_allowed: MessageTemplate,
    pub suggestion: MessageTemplate,
    pub missing: MessageTemplate,
    pub regex: MessageTemplate,
}

impl Default for Messages {
    fn default() -> Self {
        use Severity::{App, Error, Info, Success, Warning};
        Self {
            lint_success: MessageTemplate::new(App, "Branch name \"%b\" lint success!"),
            lint_error: MessageTemplate::new(App, "Branch name \"%b\" lint error!"),
            branch_skipped: MessageTemplate::new(Success, "Branch \"%b\" is skipped."),
            separator_required: MessageTemplate::new(
                Error,
                "Branch \"%b\" must contain a separator \"%s\".",
            ),
            branch_banned: MessageTemplate::new(
                Error,
                "Branches with the name \"%b\" are not allowed.",
            ),
            branch_disallowed: MessageTemplate::new(
                Error,
                "Pushing to \"%b\" is not allowed, use git-flow.",
            ),
            params_missing: MessageTemplate::new(
                Error,
                "The branch name must contain at least %pn params.",
            ),
            nth_param_not_valid: MessageTemplate::new(
                Error,
                "The parameter at position %i is not valid. Expected: %pex.",
            ),
            validating: MessageTemplate::new(Info, "Validating \"%pv\" against \"%p\" settings."),
            valid: MessageTemplate::new(Success, "Parameter \"%p\" with value \"%pv\" is valid."),
            not_allowed: MessageTemplate::new(
                Error,
                "Branch %p \"%pv\" is not allowed. Valid options are: %po",
            ),
            suggestion: MessageTemplate::new(
                Warning,
                "Instead of \"%pv\" try \"%pvs\". Other suggestions are: %ps",
            ),
            missing: MessageTemplate::new(
                Error,
                "Branch \"%p\" parameter is missing in the expected position (%pi).",
            ),
            regex: MessageTemplate::new(
                Error,
                "The \"%p\" value \"%pv\" does not match the allowed pattern: \"%pr\". %prs",
            ),
        }
    }
}

/// Root rule file structure (matches TOML/JSON). Rules are an array of
/// tables so declaration order survives deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleFile {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub skip: Vec<String>,
    #[serde(default)]
    pub banned: Vec<String>,
    #[serde(default)]
    pub disallowed: Vec<String>,
    #[serde(default = "default_indentation")]
    pub indentation: String,
    #[serde(default)]
    pub messages: Messages,
    pub params: Vec<RuleDef>,
}

fn default_separator() -> String {
    "/".to_string()
}

fn default_indentation() -> String {
    "\t".to_string()
}

/// Construction-time rule set errors. Fatal: nothing is validated against
/// a rule set that fails these checks.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no rules defined")]
    NoRules,
    #[error("a separator is required when more than one rule is defined")]
    SeparatorRequired,
    #[error("rule '{0}' must be required when it is the only rule")]
    SingleRuleOptional(String),
    #[error("duplicate rule name '{0}'")]
    DuplicateRule(String),
    #[error("rule '{0}' defines neither options nor a regex")]
    NoPolicy(String),
    #[error("rule '{0}' has no resolvable position")]
    NoPosition(String),
    #[error("rule '{name}' position {position} is beyond the rule count {count}")]
    PositionOutOfRange {
        name: String,
        position: usize,
        count: usize,
    },
    #[error("rule '{name}' has an invalid regex")]
    BadRegex {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Runtime rule (definition plus compiled pattern).
#[derive(Debug, Clone)]
pub struct Rule {
    pub def: RuleDef,
    pattern: Option<regex::Regex>,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Full-string, case-insensitive pattern check. Rules without a
    /// pattern pass trivially.
    pub fn matches_pattern(&self, value: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(value),
            None => true,
        }
    }

    pub fn not_allowed_template<'a>(&'a self, defaults: &'a Messages) -> &'a MessageTemplate {
        self.def
            .messages
            .not_allowed
            .as_ref()
            .unwrap_or(&defaults.not_allowed)
    }

    pub fn suggestion_template<'a>(&'a self, defaults: &'a Messages) -> &'a MessageTemplate {
        self.def
            .messages
            .suggestion
            .as_ref()
            .unwrap_or(&defaults.suggestion)
    }

    pub fn missing_template<'a>(&'a self, defaults: &'a Messages) -> &'a MessageTemplate {
        self.def
            .messages
            .missing
            .as_ref()
            .unwrap_or(&defaults.missing)
    }

    pub fn regex_template<'a>(&'a self, defaults: &'a Messages) -> &'a MessageTemplate {
        self.def.messages.regex.as_ref().unwrap_or(&defaults.regex)
    }

    pub fn valid_template<'a>(&'a self, defaults: &'a Messages) -> &'a MessageTemplate {
        self.def.messages.valid.as_ref().unwrap_or(&defaults.valid)
    }
}

/// Validated, immutable rule set. Read-only for the duration of a lint
/// pass so batch validation stays safe later.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub separator: String,
    pub skip: Vec<String>,
    pub banned: Vec<String>,
    pub disallowed: Vec<String>,
    pub indentation: String,
    pub messages: Messages,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Rules in declaration order. Order drives the matcher's
    /// first-eligible tie-break.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn required_count(&self) -> usize {
        self.rules.iter().filter(|r| r.def.required).count()
    }

    /// Minimal hard-coded rule set used when the embedded default file
    /// cannot be parsed.
    pub(crate) fn minimal_fallback() -> Self {
        let def = RuleDef {
            name: "prefix".to_string(),
            description: Some("The prefix for the branch".to_string()),
            required: true,
            position: Position::Single(0),
            options: Vec::new(),
            regex: Some("[a-z0-9-]+".to_string()),
            suggestions: BTreeMap::new(),
            examples: Vec::new(),
            messages: RuleMessages::default(),
        };
        let pattern = RegexBuilder::new("^[a-z0-9-]+$")
            .case_insensitive(true)
            .build()
            .ok();
        Self {
            separator: default_separator(),
            skip: Vec::new(),
            banned: Vec::new(),
            disallowed: Vec::new(),
            indentation: default_indentation(),
            messages: Messages::default(),
            rules: vec![Rule { def, pattern }],
        }
    }
}

impl TryFrom<RuleFile> for RuleSet {
    type Error = ConfigError;

    fn try_from(file: RuleFile) -> Result<Self, ConfigError> {
        if file.params.is_empty() {
            return Err(ConfigError::NoRules);
        }
        if file.params.len() > 1 && file.separator.is_empty() {
            return Err(ConfigError::SeparatorRequired);
        }
        if file.params.len() == 1 && !file.params[0].required {
            return Err(ConfigError::SingleRuleOptional(file.params[0].name.clone()));
        }

        let count = file.params.len();
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(count);
        for def in file.params {
            if !seen.insert(def.name.clone()) {
                return Err(ConfigError::DuplicateRule(def.name));
            }
            if def.options.is_empty() && def.regex.is_none() {
                return Err(ConfigError::NoPolicy(def.name));
            }
            match def.position.max() {
                None => return Err(ConfigError::NoPosition(def.name)),
                Some(max) if max >= count => {
                    return Err(ConfigError::PositionOutOfRange {
                        name: def.name,
                        position: max,
                        count,
                    });
                }
                Some(_) => {}
            }
            // Anchored literally as `^{pattern}$` so top-level alternations
            // keep their historical anchoring.
            let pattern = match &def.regex {
                Some(raw) => Some(
                    RegexBuilder::new(&format!("^{raw}$"))
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| ConfigError::BadRegex {
                            name: def.name.clone(),
                            source,
                        })?,
                ),
                None => None,
            };
            rules.push(Rule { def, pattern });
        }

        Ok(RuleSet {
            separator: file.separator,
            skip: file.skip,
            banned: file.banned,
            disallowed: file.disallowed,
            indentation: file.indentation,
            messages: file.messages,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, required: bool, position: Position) -> RuleDef {
        RuleDef {
            name: name.to_string(),
            description: None,
            required,
            position,
            options: Vec::new(),
            regex: Some("[a-z-]+".to_string()),
            suggestions: BTreeMap::new(),
            examples: Vec::new(),
            messages: RuleMessages::default(),
        }
    }

    fn file(params: Vec<RuleDef>) -> RuleFile {
        RuleFile {
            separator: "/".to_string(),
            skip: Vec::new(),
            banned: Vec::new(),
            disallowed: Vec::new(),
            indentation: "\t".to_string(),
            messages: Messages::default(),
            params,
        }
    }

    #[test]
    fn test_position_contains_and_display() {
        let single = Position::Single(0);
        assert!(single.contains(0));
        assert!(!single.contains(1));
        assert!(!single.is_list());
        assert_eq!(single.one_based(), "1");

        let multi = Position::Multiple(vec![1, 2]);
        assert!(multi.contains(2));
        assert!(!multi.contains(0));
        assert!(multi.is_list());
        assert_eq!(multi.one_based(), "2 || 3");
    }

    #[test]
    fn test_empty_rule_set_rejected() {
        let result = RuleSet::try_from(file(vec![]));
        assert!(matches!(result, Err(ConfigError::NoRules)));
    }

    #[test]
    fn test_separator_required_with_multiple_rules() {
        let mut f = file(vec![
            rule("prefix", true, Position::Single(0)),
            rule("description", true, Position::Single(1)),
        ]);
        f.separator = String::new();
        let result = RuleSet::try_from(f);
        assert!(matches!(result, Err(ConfigError::SeparatorRequired)));
    }

    #[test]
    fn test_single_rule_must_be_required() {
        let result = RuleSet::try_from(file(vec![rule("prefix", false, Position::Single(0))]));
        assert!(matches!(result, Err(ConfigError::SingleRuleOptional(_))));
    }

    #[test]
    fn test_rule_needs_options_or_regex() {
        let mut def = rule("prefix", true, Position::Single(0));
        def.regex = None;
        let result = RuleSet::try_from(file(vec![def]));
        assert!(matches!(result, Err(ConfigError::NoPolicy(_))));
    }

    #[test]
    fn test_position_beyond_rule_count_rejected() {
        let result = RuleSet::try_from(file(vec![rule("prefix", true, Position::Single(3))]));
        assert!(matches!(
            result,
            Err(ConfigError::PositionOutOfRange { position: 3, .. })
        ));
    }

    #[test]
    fn test_empty_position_list_rejected() {
        let result = RuleSet::try_from(file(vec![rule(
            "prefix",
            true,
            Position::Multiple(Vec::new()),
        )]));
        assert!(matches!(result, Err(ConfigError::NoPosition(_))));
    }

    #[test]
    fn test_duplicate_rule_names_rejected() {
        let result = RuleSet::try_from(file(vec![
            rule("prefix", true, Position::Single(0)),
            rule("prefix", true, Position::Single(1)),
        ]));
        assert!(matches!(result, Err(ConfigError::DuplicateRule(_))));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut def = rule("prefix", true, Position::Single(0));
        def.regex = Some("[unclosed".to_string());
        let result = RuleSet::try_from(file(vec![def]));
        assert!(matches!(result, Err(ConfigError::BadRegex { .. })));
    }

    #[test]
    fn test_pattern_match_is_anchored_and_case_insensitive() {
        let rules =
            RuleSet::try_from(file(vec![rule("prefix", true, Position::Single(0))])).unwrap();
        let prefix = rules.rule("prefix").unwrap();
        assert!(prefix.matches_pattern("feature"));
        assert!(prefix.matches_pattern("FEATURE"));
        assert!(!prefix.matches_pattern("feature1"));
        assert!(!prefix.matches_pattern("a feature"));
    }

    #[test]
    fn test_required_count() {
        let rules = RuleSet::try_from(file(vec![
            rule("prefix", true, Position::Single(0)),
            rule("ticket", false, Position::Single(1)),
            rule("description", true, Position::Multiple(vec![1, 2])),
        ]))
        .unwrap();
        assert_eq!(rules.required_count(), 2);
    }

    #[test]
    fn test_rule_file_from_toml() {
        let toml_src = r#"
            separator = "/"
            banned = ["wip"]

            [[params]]
            name = "prefix"
            required = true
            position = 0
            options = ["feature", "hotfix"]

            [[params]]
            name = "description"
            required = true
            position = [1, 2]
            regex = "[a-z0-9.-]+"
        "#;
        let parsed: RuleFile = toml::from_str(toml_src).unwrap();
        let rules = RuleSet::try_from(parsed).unwrap();
        assert_eq!(rules.rules().len(), 2);
        assert_eq!(rules.rules()[0].name(), "prefix");
        assert_eq!(rules.rules()[1].def.position, Position::Multiple(vec![1, 2]));
        assert_eq!(rules.banned, vec!["wip".to_string()]);
    }

    #[test]
    fn test_message_fallback_to_global_default() {
        let rules =
            RuleSet::try_from(file(vec![rule("prefix", true, Position::Single(0))])).unwrap();
        let defaults = Messages::default();
        let prefix = rules.rule("prefix").unwrap();
        assert_eq!(prefix.valid_template(&defaults), &defaults.valid);
        assert_eq!(prefix.missing_template(&defaults), &defaults.missing);
    }

    #[test]
    fn test_minimal_fallback_is_usable() {
        let rules = RuleSet::minimal_fallback();
        assert_eq!(rules.rules().len(), 1);
        assert!(rules.rules()[0].def.required);
        assert!(rules.rules()[0].matches_pattern("feature"));
    }
}
