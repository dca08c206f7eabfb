//! Configuration management for the branch name linter.
//!
//! Handles:
//! - Command-line argument parsing
//! - Verbosity flag normalization

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the branch name linter
#[derive(Debug, Parser)]
#[command(name = "branch-lint")]
#[command(about = "Lint a branch name against a positional rule set")]
#[command(version)]
pub struct Args {
    /// Branch name to lint instead of the current git branch
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Rule file to use
    #[arg(long, help = "Path to a branchlint.toml or branchlint.json rule file")]
    pub config: Option<PathBuf>,

    /// Also print the per-rule progress diagnostics
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Only print the final pass/fail line
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Print nothing; the exit code is the only output
    #[arg(long, short = 'm')]
    pub mute: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level for the linter
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Branch name explicitly set via command line
    pub branch: Option<String>,
    /// Rule file explicitly set via command line
    pub rule_file: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
    pub mute: bool,
    pub color: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // Quiet and mute trump verbose; mute implies quiet.
        Ok(Config {
            branch: args.branch,
            rule_file: args.config,
            verbose: args.verbose && !args.quiet && !args.mute,
            quiet: args.quiet || args.mute,
            mute: args.mute,
            color: !args.no_color,
            log_level: args.log_level,
        })
    }
}
