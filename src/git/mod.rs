//! Safe update of the catalog working tree.
//!
//! Runs `git` as an external process. A pull only happens when the tree is
//! a repository with no uncommitted tracked changes and an upstream branch
//! that shares history with `HEAD`. Untracked files are left alone.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Outcome of one git step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitStep {
    pub name: String,
    pub success: bool,
    pub message: String,
}

impl GitStep {
    fn ok(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.into(),
        }
    }

    fn failed(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.into(),
        }
    }
}

/// Steps of a safe pull, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullReport {
    pub steps: Vec<GitStep>,
}

impl PullReport {
    /// Returns true if every step that ran succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.success)
    }

    fn push(&mut self, step: GitStep) -> bool {
        let success = step.success;
        self.steps.push(step);
        success
    }
}

/// Output text of a git invocation; stderr when stdout is empty.
fn output_text(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stdout.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        stdout.trim().to_string()
    }
}

/// Runs git commands inside one working tree.
#[derive(Debug, Clone)]
pub struct GitUpdater {
    repo_dir: PathBuf,
}

impl GitUpdater {
    #[must_use]
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    #[must_use]
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .with_context(|| format!("Failed to execute 'git {}'", args.join(" ")))
    }

    /// Returns true if the directory is inside a git working tree.
    #[must_use]
    pub fn is_repository(&self) -> bool {
        self.git(&["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|o| o.status.success() && output_text(&o) == "true")
    }

    /// Returns true if tracked files have staged or unstaged changes.
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain", "--untracked-files=no"])?;
        if !output.status.success() {
            anyhow::bail!("git status failed: {}", output_text(&output));
        }
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    fn run_step(&self, report: &mut PullReport, name: &str, args: &[&str]) -> bool {
        let step = match self.git(args) {
            Ok(output) if output.status.success() => {
                let text = output_text(&output);
                GitStep::ok(name, if text.is_empty() { "done".to_string() } else { text })
            }
            Ok(output) => GitStep::failed(name, output_text(&output)),
            Err(e) => GitStep::failed(name, format!("{e:#}")),
        };
        tracing::debug!(step = name, success = step.success, "{}", step.message);
        report.push(step)
    }

    /// Pulls the upstream branch when it is safe to do so.
    ///
    /// Stops at the first failing step.
    #[must_use]
    pub fn safe_pull(&self) -> PullReport {
        let mut report = PullReport::default();

        let repository = if self.is_repository() {
            GitStep::ok("repository", format!("{} is a git repository", self.repo_dir.display()))
        } else {
            GitStep::failed(
                "repository",
                format!("{} is not a git repository", self.repo_dir.display()),
            )
        };
        if !report.push(repository) {
            return report;
        }

        let clean = match self.has_uncommitted_changes() {
            Ok(false) => GitStep::ok("working tree", "no uncommitted changes"),
            Ok(true) => GitStep::failed(
                "working tree",
                "uncommitted changes to tracked files; commit or stash them first",
            ),
            Err(e) => GitStep::failed("working tree", format!("{e:#}")),
        };
        if !report.push(clean) {
            return report;
        }

        if !self.run_step(&mut report, "fetch", &["fetch"]) {
            return report;
        }
        if !self.run_step(&mut report, "upstream", &["merge-base", "HEAD", "@{u}"]) {
            return report;
        }
        self.run_step(&mut report, "pull", &["pull"]);

        report
    }
}
