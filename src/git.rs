//! Identifier source: the current git branch.
//!
//! This is the only external collaborator that blocks; it runs to
//! completion before any validation starts.

use anyhow::{Context, Result, bail};
use std::process::Command;

/// Name of the currently checked-out branch, trimmed.
pub fn current_branch() -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .context("failed to run git rev-parse")?;
    if !output.status.success() {
        bail!(
            "git rev-parse failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let branch =
        String::from_utf8(output.stdout).context("git returned a non-UTF-8 branch name")?;
    Ok(branch.trim().to_string())
}
