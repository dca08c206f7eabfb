//! Validation Engine
//!
//! Splits a branch name on the configured separator, drives the rule
//! matcher over every token position, and aggregates the outcome into a
//! `LintResult`. The rule set is read-only for the whole pass.

use std::collections::HashSet;

use crate::rules::{ERROR_CODE, MessageTemplate, Rule, RuleSet, SUCCESS_CODE, Severity};
use crate::template::{RenderContext, render};

/// A rendered, severity-tagged validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub text: String,
    pub indent: usize,
}

/// Outcome of a full lint pass: exit code plus the ordered diagnostics
/// produced along the way. The caller decides what to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    pub code: i32,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Per-token outcome. Created once per token, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutcome {
    pub valid: bool,
    /// Satisfied rule name on success; first eligible rule name when the
    /// token failed every eligible rule; `None` when no rule was eligible.
    pub rule: Option<String>,
    pub value: String,
    pub message: String,
}

/// Branch name linter over an immutable rule set.
pub struct Linter<'a> {
    rules: &'a RuleSet,
}

impl<'a> Linter<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Run the full pipeline for one branch name.
    ///
    /// Early exits (skip, banned, disallowed, missing separator, too few
    /// params) emit the wrapper first, then the detail; the per-token path
    /// emits per-token diagnostics, then missing-required diagnostics,
    /// then the wrapper.
    pub fn evaluate(&self, branch: &str) -> LintResult {
        let msgs = &self.rules.messages;

        if self.rules.skip.iter().any(|s| s == branch) {
            return self.early_exit(SUCCESS_CODE, branch, &msgs.branch_skipped);
        }
        if self.rules.banned.iter().any(|b| b == branch) {
            return self.early_exit(ERROR_CODE, branch, &msgs.branch_banned);
        }
        if self.rules.disallowed.iter().any(|d| d == branch) {
            return self.early_exit(ERROR_CODE, branch, &msgs.branch_disallowed);
        }

        // A single-rule set treats the whole branch as one token and needs
        // no separator.
        let multiple = self.rules.rules().len() > 1;
        if multiple && !branch.contains(self.rules.separator.as_str()) {
            return self.early_exit(ERROR_CODE, branch, &msgs.separator_required);
        }
        let tokens: Vec<&str> = if multiple {
            branch.split(self.rules.separator.as_str()).collect()
        } else {
            vec![branch]
        };

        if self.rules.required_count() > tokens.len() {
            return self.early_exit(ERROR_CODE, branch, &msgs.params_missing);
        }

        let mut diagnostics = Vec::new();
        let mut outcomes = Vec::with_capacity(tokens.len());
        let mut satisfied: HashSet<String> = HashSet::new();
        for (index, value) in tokens.iter().enumerate() {
            let outcome = self.match_token_at(branch, value, index, &satisfied, &mut diagnostics);
            if outcome.valid {
                if let Some(name) = &outcome.rule {
                    satisfied.insert(name.clone());
                }
            }
            outcomes.push(outcome);
        }

        let mut missing_required = 0;
        for rule in self.rules.rules() {
            if rule.def.required && !satisfied.contains(rule.name()) {
                missing_required += 1;
                let ctx = RenderContext {
                    branch,
                    rule: Some(rule),
                    ..Default::default()
                };
                diagnostics.push(self.diag(rule.missing_template(msgs), &ctx));
            }
        }

        let valid_count = outcomes.iter().filter(|o| o.valid).count();
        let code = if missing_required == 0 && valid_count == tokens.len() {
            SUCCESS_CODE
        } else {
            ERROR_CODE
        };
        let wrapper = if code == SUCCESS_CODE {
            &msgs.lint_success
        } else {
            &msgs.lint_error
        };
        let base = RenderContext {
            branch,
            ..Default::default()
        };
        diagnostics.push(self.diag(wrapper, &base));

        LintResult { code, diagnostics }
    }

    /// Match one token against the rules eligible at its position.
    ///
    /// Rules already satisfied by another token are excluded, so a rule
    /// contributes at most one satisfied token overall. Eligible rules are
    /// probed in declaration order; when every probe fails, the FIRST
    /// eligible rule's `missing` template is carried in the outcome
    /// (declaration-order tie-break, preserved for reproducibility).
    pub fn match_token_at(
        &self,
        branch: &str,
        value: &str,
        position: usize,
        satisfied: &HashSet<String>,
        out: &mut Vec<Diagnostic>,
    ) -> TokenOutcome {
        let msgs = &self.rules.messages;
        let at_position: Vec<&Rule> = self
            .rules
            .rules()
            .iter()
            .filter(|r| r.def.position.contains(position))
            .collect();
        let eligible: Vec<&Rule> = at_position
            .iter()
            .copied()
            .filter(|r| !satisfied.contains(r.name()))
            .collect();

        if eligible.is_empty() {
            // Distinct failure mode: nothing left to match here. Carry the
            // names of rules that declare this position as the hint.
            let expected: Vec<String> = at_position
                .iter()
                .map(|r| r.name().to_string())
                .collect();
            let ctx = RenderContext {
                branch,
                index: Some(position),
                expected: &expected,
                ..Default::default()
            };
            let template = &msgs.nth_param_not_valid;
            let message = render(&template.text, self.rules, &ctx);
            out.push(Diagnostic {
                severity: template.severity,
                text: message.clone(),
                indent: template.indent,
            });
            return TokenOutcome {
                valid: false,
                rule: None,
                value: value.to_string(),
                message,
            };
        }

        for &rule in &eligible {
            let ctx = RenderContext {
                branch,
                rule: Some(rule),
                value: Some(value),
                ..Default::default()
            };
            out.push(self.diag(&msgs.validating, &ctx));

            // List-declared rules emit diagnostics on mismatch at every one
            // of their positions.
            let mandatory_here = rule.def.required
                && (rule.def.position.is_list() || rule.def.position.contains(position));

            if !rule.def.options.is_empty() && !rule.def.options.iter().any(|o| o == value) {
                if mandatory_here {
                    out.push(self.diag(rule.not_allowed_template(msgs), &ctx));
                    if rule.def.suggestions.contains_key(value) {
                        out.push(self.diag(rule.suggestion_template(msgs), &ctx));
                    }
                }
                continue;
            }
            if !rule.matches_pattern(value) {
                if mandatory_here {
                    out.push(self.diag(rule.regex_template(msgs), &ctx));
                }
                continue;
            }

            let template = rule.valid_template(msgs);
            let message = render(&template.text, self.rules, &ctx);
            out.push(Diagnostic {
                severity: template.severity,
                text: message.clone(),
                indent: template.indent,
            });
            return TokenOutcome {
                valid: true,
                rule: Some(rule.name().to_string()),
                value: value.to_string(),
                message,
            };
        }

        let first = eligible[0];
        let ctx = RenderContext {
            branch,
            rule: Some(first),
            value: Some(value),
            ..Default::default()
        };
        let message = render(&first.missing_template(msgs).text, self.rules, &ctx);
        TokenOutcome {
            valid: false,
            rule: Some(first.name().to_string()),
            value: value.to_string(),
            message,
        }
    }

    fn early_exit(&self, code: i32, branch: &str, detail: &MessageTemplate) -> LintResult {
        let msgs = &self.rules.messages;
        let wrapper = if code == SUCCESS_CODE {
            &msgs.lint_success
        } else {
            &msgs.lint_error
        };
        let ctx = RenderContext {
            branch,
            ..Default::default()
        };
        LintResult {
            code,
            diagnostics: vec![self.diag(wrapper, &ctx), self.diag(detail, &ctx)],
        }
    }

    fn diag(&self, template: &MessageTemplate, ctx: &RenderContext) -> Diagnostic {
        Diagnostic {
            severity: template.severity,
            text: render(&template.text, self.rules, ctx),
            indent: template.indent,
        }
    }
}
