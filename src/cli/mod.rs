//! CLI command handlers for StylistGuild.
//!
//! Each command lives in its own module as a clap `Args` struct with an
//! `execute` method. Handlers print results on stdout and return a
//! [`CliError`](common::CliError) whose kind selects the exit code.

pub mod add;
pub mod backup;
pub mod common;
pub mod config;
pub mod doctor;
pub mod import;
pub mod lint;
pub mod merge;
pub mod missing;
pub mod pull;
pub mod render;
pub mod stats;
pub mod status;
pub mod tags;
pub mod validate;

use clap::Subcommand;

// Re-export types used by main.rs and tests
pub use add::AddArgs;
pub use backup::BackupArgs;
pub use common::{CliError, CliResult, ExitCode, GlobalOptions};
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use import::ImportArgs;
pub use lint::LintArgs;
pub use merge::MergeArgs;
pub use missing::MissingArgs;
pub use pull::PullArgs;
pub use render::RenderArgs;
pub use stats::StatsArgs;
pub use status::StatusArgs;
pub use tags::TagsArgs;
pub use validate::ValidateArgs;

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show how far the addon catalog covers the official one
    Status(StatusArgs),
    /// File and tag statistics
    Stats(StatsArgs),
    /// Validate both catalog files
    Validate(ValidateArgs),
    /// List official themes without addon data
    Missing(MissingArgs),
    /// Interactively add addon entries for missing themes
    Add(AddArgs),
    /// Merge contributor files into the addon catalog
    Merge(MergeArgs),
    /// Render theme pages, the categories page and the index
    Render(RenderArgs),
    /// Tag maintenance
    Tags(TagsArgs),
    /// Backup management
    Backup(BackupArgs),
    /// Replace the official catalog with a new upstream copy
    Import(ImportArgs),
    /// Check the docs tree for broken content
    Lint(LintArgs),
    /// Pull upstream changes when the working tree is clean
    Pull(PullArgs),
    /// Check the maintenance environment
    Doctor(DoctorArgs),
    /// Show or create configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Runs the selected command.
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        match self {
            Self::Status(args) => args.execute(globals),
            Self::Stats(args) => args.execute(globals),
            Self::Validate(args) => args.execute(globals),
            Self::Missing(args) => args.execute(globals),
            Self::Add(args) => args.execute(globals),
            Self::Merge(args) => args.execute(globals),
            Self::Render(args) => args.execute(globals),
            Self::Tags(args) => args.execute(globals),
            Self::Backup(args) => args.execute(globals),
            Self::Import(args) => args.execute(globals),
            Self::Lint(args) => args.execute(globals),
            Self::Pull(args) => args.execute(globals),
            Self::Doctor(args) => args.execute(globals),
            Self::Config(args) => args.execute(globals),
        }
    }
}
