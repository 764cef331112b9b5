//! Backup management commands.

use crate::cli::common::{confirm, io_error, print_json, store, CliError, CliResult, GlobalOptions};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

/// Backup management
#[derive(Debug, Clone, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum BackupCommand {
    /// Back up both catalog files
    Create(BackupCreateArgs),
    /// List backups, newest first
    List(BackupListArgs),
    /// Restore a catalog file from a backup
    Restore(BackupRestoreArgs),
    /// Delete backups older than a number of days
    Clean(BackupCleanArgs),
}

/// Which catalog file a command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CatalogFile {
    Official,
    Addon,
}

/// Back up both catalog files
#[derive(Debug, Clone, Args)]
pub struct BackupCreateArgs {
    /// Label appended to the backup names
    #[arg(short, long)]
    label: Option<String>,
}

/// List backups
#[derive(Debug, Clone, Args)]
pub struct BackupListArgs {
    /// Only backups whose name starts with this prefix
    #[arg(long)]
    filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Restore a catalog file
#[derive(Debug, Clone, Args)]
pub struct BackupRestoreArgs {
    /// Catalog to restore
    #[arg(value_enum)]
    file: CatalogFile,

    /// Backup file name; defaults to the newest backup of that catalog
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Restore without asking for confirmation
    #[arg(short, long)]
    yes: bool,
}

/// Delete old backups
#[derive(Debug, Clone, Args)]
pub struct BackupCleanArgs {
    /// Keep backups newer than this many days
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl BackupArgs {
    /// Execute backup subcommand
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            BackupCommand::Create(args) => args.execute(globals),
            BackupCommand::List(args) => args.execute(globals),
            BackupCommand::Restore(args) => args.execute(globals),
            BackupCommand::Clean(args) => args.execute(globals),
        }
    }
}

impl BackupCreateArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);

        let created = store
            .backups()
            .create(&[store.official_path(), store.addon_path()], self.label.as_deref())
            .map_err(io_error("Backup failed"))?;

        if created.is_empty() {
            return Err(CliError::io("No catalog files found to back up"));
        }
        for path in &created {
            println!("✓ {}", path.display());
        }
        Ok(())
    }
}

impl BackupListArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let backups = store(&config)
            .backups()
            .list(self.filter.as_deref())
            .map_err(io_error("Failed to list backups"))?;

        if self.json {
            return print_json(&backups);
        }

        if backups.is_empty() {
            println!("No backups in {}", config.paths.backup_dir.display());
            return Ok(());
        }
        for backup in &backups {
            println!(
                "  {}  {:>10} bytes  {}",
                backup.created.format("%Y-%m-%d %H:%M:%S"),
                backup.size,
                backup.file_name
            );
        }
        Ok(())
    }
}

impl BackupRestoreArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let store = store(&config);
        let original: &Path = match self.file {
            CatalogFile::Official => store.official_path(),
            CatalogFile::Addon => store.addon_path(),
        };

        if !self.yes && !confirm(&format!("Overwrite {}?", original.display()))? {
            println!("Restore cancelled");
            return Ok(());
        }

        let backup = store
            .backups()
            .restore(original, self.name.as_deref())
            .map_err(|e| CliError::validation(format!("Restore failed: {e:#}")))?;
        println!("✓ Restored {} from {}", original.display(), backup.display());
        Ok(())
    }
}

impl BackupCleanArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = globals.load_config()?;
        let report = store(&config)
            .backups()
            .cleanup(self.days)
            .map_err(io_error("Cleanup failed"))?;

        if self.json {
            return print_json(&report);
        }
        println!(
            "✓ Removed {} backups older than {} days ({} kept, {} errors)",
            report.removed, self.days, report.kept, report.errors
        );
        Ok(())
    }
}
