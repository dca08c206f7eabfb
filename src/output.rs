//! Console reporting for lint diagnostics.
//!
//! The core only tags diagnostics with a severity; the mapping to colors
//! and the verbosity gating live here.

use colored::{Color, Colorize};

use crate::config::Config;
use crate::rules::Severity;
use crate::validation::{Diagnostic, LintResult};

/// Foreground/background pair for a severity tag.
fn style(severity: Severity) -> (Color, Color) {
    match severity {
        Severity::Error => (Color::White, Color::Red),
        Severity::Success => (Color::White, Color::Green),
        Severity::Info => (Color::White, Color::Blue),
        Severity::Warning => (Color::Black, Color::Yellow),
        Severity::App => (Color::Black, Color::White),
    }
}

/// Writes rendered diagnostics to the console, gated by the caller's
/// verbosity flags.
#[derive(Debug, Clone)]
pub struct Reporter {
    verbose: bool,
    quiet: bool,
    mute: bool,
    color: bool,
    indentation: String,
}

impl Reporter {
    pub fn new(config: &Config, indentation: &str) -> Self {
        Self {
            verbose: config.verbose,
            quiet: config.quiet,
            mute: config.mute,
            color: config.color,
            indentation: indentation.to_string(),
        }
    }

    pub fn report(&self, result: &LintResult) {
        for diagnostic in &result.diagnostics {
            if self.should_print(diagnostic.severity) {
                println!("{}", self.format(diagnostic));
            }
        }
    }

    /// mute prints nothing; quiet keeps only the pass/fail wrapper;
    /// progress diagnostics need verbose.
    fn should_print(&self, severity: Severity) -> bool {
        if self.mute {
            return false;
        }
        if self.quiet {
            return severity == Severity::App;
        }
        if severity == Severity::Info {
            return self.verbose;
        }
        true
    }

    /// `[SCOPE]` tag on its own line, then the indented message.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let tag = format!("[{}]", diagnostic.severity.tag());
        let indent = self.indentation.repeat(diagnostic.indent);
        if self.color {
            let (fg, bg) = style(diagnostic.severity);
            format!(
                "{}\n{}{}",
                tag.as_str().color(fg).on_color(bg),
                indent,
                diagnostic.text.as_str().color(fg).on_color(bg)
            )
        } else {
            format!("{tag}\n{indent}{}", diagnostic.text)
        }
    }
}
