//! Message templating.
//!
//! Substitutes the recognized placeholder tokens in a message template
//! with values drawn from the rule set and the current render context.
//! Single pass, longest token wins, unknown tokens are left verbatim.

use std::collections::BTreeMap;

use crate::rules::{Rule, RuleSet};

/// The recognized placeholder tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    /// `%b` — the branch name under validation
    Branch,
    /// `%bb` — banned list, comma-joined
    BannedList,
    /// `%bd` — disallowed list, comma-joined
    DisallowedList,
    /// `%bs` — skip list, comma-joined
    SkipList,
    /// `%s` — configured separator
    Separator,
    /// `%pn` — count of required rules
    RequiredCount,
    /// `%p` — rule name
    RuleName,
    /// `%pv` — token value verbatim
    Value,
    /// `%pvs` — suggested canonical replacement for the token value
    ValueSuggestion,
    /// `%po` — rule option list, comma-joined
    Options,
    /// `%ps` — suggestion table entries, `For X => Y` comma-joined
    Suggestions,
    /// `%pi` — rule position(s), one-based, `" || "`-joined
    PositionHint,
    /// `%pr` — raw pattern text
    Pattern,
    /// `%prs` — regex-example hint sentence
    PatternExamples,
    /// `%pex` — expected rule names with their policies
    Expected,
    /// `%i` — one-based token index
    TokenIndex,
}

// Longest tokens first so `%pvs` never scans as `%pv` followed by `s`.
const TOKENS: &[(&str, Placeholder)] = &[
    ("%pvs", Placeholder::ValueSuggestion),
    ("%prs", Placeholder::PatternExamples),
    ("%pex", Placeholder::Expected),
    ("%bb", Placeholder::BannedList),
    ("%bd", Placeholder::DisallowedList),
    ("%bs", Placeholder::SkipList),
    ("%pn", Placeholder::RequiredCount),
    ("%pv", Placeholder::Value),
    ("%po", Placeholder::Options),
    ("%ps", Placeholder::Suggestions),
    ("%pi", Placeholder::PositionHint),
    ("%pr", Placeholder::Pattern),
    ("%p", Placeholder::RuleName),
    ("%b", Placeholder::Branch),
    ("%s", Placeholder::Separator),
    ("%i", Placeholder::TokenIndex),
];

/// Context for one render call. Rule-scoped placeholders resolve to the
/// empty string when `rule` is `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub branch: &'a str,
    pub rule: Option<&'a Rule>,
    pub value: Option<&'a str>,
    pub index: Option<usize>,
    pub expected: &'a [String],
}

/// Render a message template against the rule set and context.
pub fn render(template: &str, rules: &RuleSet, ctx: &RenderContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, placeholder)) => {
                out.push_str(&resolve(*placeholder, rules, ctx));
                rest = &rest[token.len()..];
            }
            None => {
                out.push('%');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve(placeholder: Placeholder, rules: &RuleSet, ctx: &RenderContext) -> String {
    match placeholder {
        Placeholder::Branch => ctx.branch.to_string(),
        Placeholder::BannedList => rules.banned.join(", "),
        Placeholder::DisallowedList => rules.disallowed.join(", "),
        Placeholder::SkipList => rules.skip.join(", "),
        Placeholder::Separator => rules.separator.clone(),
        Placeholder::RequiredCount => rules.required_count().to_string(),
        Placeholder::TokenIndex => ctx
            .index
            .map(|i| (i + 1).to_string())
            .unwrap_or_default(),
        Placeholder::Expected => expected_hint(rules, ctx.expected),
        rule_scoped => match ctx.rule {
            Some(rule) => resolve_rule(rule_scoped, rule, ctx),
            None => String::new(),
        },
    }
}

fn resolve_rule(placeholder: Placeholder, rule: &Rule, ctx: &RenderContext) -> String {
    match placeholder {
        Placeholder::RuleName => rule.name().to_string(),
        Placeholder::Value => ctx.value.unwrap_or_default().to_string(),
        Placeholder::ValueSuggestion => ctx
            .value
            .and_then(|v| rule.def.suggestions.get(v))
            .cloned()
            .unwrap_or_default(),
        Placeholder::Options => rule.def.options.join(", "),
        Placeholder::Suggestions => suggestion_hint(&rule.def.suggestions),
        Placeholder::PositionHint => rule.def.position.one_based(),
        Placeholder::Pattern => rule.def.regex.clone().unwrap_or_default(),
        Placeholder::PatternExamples => {
            if rule.def.examples.is_empty() {
                String::new()
            } else {
                format!(
                    "This is valid when the value is for example: {}",
                    rule.def.examples.join(", ")
                )
            }
        }
        _ => String::new(),
    }
}

fn suggestion_hint(suggestions: &BTreeMap<String, String>) -> String {
    suggestions
        .iter()
        .map(|(from, to)| format!("For {from} => {to}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `name (options or pattern)` per expected rule, comma-joined.
fn expected_hint(rules: &RuleSet, expected: &[String]) -> String {
    let mut parts = Vec::with_capacity(expected.len());
    for name in expected {
        let Some(rule) = rules.rule(name) else {
            continue;
        };
        let policy = if rule.def.options.is_empty() {
            rule.def.regex.clone().unwrap_or_default()
        } else {
            rule.def.options.join(", ")
        };
        parts.push(format!("{name} ({policy})"));
    }
    parts.join(", ")
}
