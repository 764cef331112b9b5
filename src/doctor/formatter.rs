//! Output formatting for environment check results.
//!
//! Terminal output uses ✓/✗/⚠ indicators with a summary and next steps;
//! JSON output is meant for scripts.

use crate::doctor::{CheckResult, CheckStatus};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// JSON output structure for doctor results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Overall health status (`ready`, `missing`, `warnings`)
    pub status: String,
    pub passed: usize,
    pub failed: usize,
    pub unknown: usize,
    pub checks: Vec<JsonCheck>,
}

/// JSON representation of a single check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCheck {
    pub name: String,
    /// `available`, `missing` or `unknown`
    pub status: String,
    pub detail: Option<String>,
    pub message: String,
    pub hint: Option<String>,
}

/// Fix suggestion for a failed check.
fn hint(name: &str) -> Option<&'static str> {
    match name {
        "Git" => Some("Install git from https://git-scm.com/downloads"),
        "Official catalog" => Some("Run 'stylistguild import <FILE>' or set paths.official"),
        "Addon catalog" => Some("Create it with '[]' or set paths.addon"),
        "Docs directory" => Some("Create the docs tree or set paths.docs"),
        "Tag macros" => Some("Fix the JSON object in paths.macros or remove the file"),
        "GitHub token" => Some("Export GITHUB_TOKEN or set github.token"),
        _ => None,
    }
}

fn counts(results: &[CheckResult]) -> (usize, usize, usize) {
    let count = |status| results.iter().filter(|r| r.status == status).count();
    (
        count(CheckStatus::Available),
        count(CheckStatus::Missing),
        count(CheckStatus::Unknown),
    )
}

/// Formatter for environment check results.
pub struct DoctorFormatter {
    format: OutputFormat,
}

impl DoctorFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_format(OutputFormat::Terminal)
    }

    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats check results for display or parsing.
    #[must_use]
    pub fn format_results(&self, results: &[CheckResult]) -> String {
        match self.format {
            OutputFormat::Terminal => Self::format_terminal(results),
            OutputFormat::Json => Self::format_json(results),
        }
    }

    fn format_terminal(results: &[CheckResult]) -> String {
        let mut output = String::new();

        output.push_str("Catalog Environment Status\n");
        output.push_str("══════════════════════════\n\n");

        let (passed, failed, unknown) = counts(results);

        for result in results {
            let (symbol, status_text) = match result.status {
                CheckStatus::Available => ("✓", "OK"),
                CheckStatus::Missing => ("✗", "MISSING"),
                CheckStatus::Unknown => ("⚠", "UNKNOWN"),
            };

            // ✓ Git ................. OK (2.43.0)
            let name_width: usize = 20;
            let dots = ".".repeat(name_width.saturating_sub(result.name.len()));
            let _ = write!(output, "{symbol} {}{dots} {status_text}", result.name);
            if let Some(detail) = &result.detail {
                let _ = write!(output, " ({detail})");
            }
            output.push('\n');

            if result.status != CheckStatus::Available {
                for line in result.message.lines() {
                    let _ = writeln!(output, "    {line}");
                }
                if let Some(hint) = hint(&result.name) {
                    let _ = writeln!(output, "    Fix: {hint}");
                }
            }
        }

        output.push_str("\n──────────────────────────\n");
        let _ = write!(output, "Summary: {passed} passed");
        if failed > 0 {
            let _ = write!(output, ", {failed} failed");
        }
        if unknown > 0 {
            let _ = write!(output, ", {unknown} unknown");
        }
        output.push('\n');

        if failed == 0 && unknown == 0 {
            output.push_str("\n✓ Environment is ready\n");
        } else if failed > 0 {
            output.push_str("\n✗ Some checks failed\n");
            output.push_str("  Apply the fixes above and run 'doctor' again.\n");
        } else {
            output.push_str("\n⚠ Some checks could not be completed\n");
            output.push_str("  Review the warnings above.\n");
        }

        output
    }

    fn format_json(results: &[CheckResult]) -> String {
        let (passed, failed, unknown) = counts(results);

        let status = if failed == 0 && unknown == 0 {
            "ready"
        } else if failed > 0 {
            "missing"
        } else {
            "warnings"
        };

        let checks = results
            .iter()
            .map(|r| JsonCheck {
                name: r.name.clone(),
                status: match r.status {
                    CheckStatus::Available => "available",
                    CheckStatus::Missing => "missing",
                    CheckStatus::Unknown => "unknown",
                }
                .to_string(),
                detail: r.detail.clone(),
                message: r.message.clone(),
                hint: (r.status != CheckStatus::Available)
                    .then(|| hint(&r.name).map(str::to_string))
                    .flatten(),
            })
            .collect();

        let json_output = JsonOutput {
            status: status.to_string(),
            passed,
            failed,
            unknown,
            checks,
        };

        serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
