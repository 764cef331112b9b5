//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, GlobalOptions};
use crate::config::Config;
use crate::constants::LOCAL_CONFIG_FILE;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display the resolved configuration
    Show(ConfigShowArgs),
    /// Write a configuration file with default values
    Init(ConfigInitArgs),
}

/// Display the resolved configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write a default configuration file
#[derive(Args, Debug, Clone)]
pub struct ConfigInitArgs {
    /// Destination file
    #[arg(long, value_name = "FILE", default_value = LOCAL_CONFIG_FILE)]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(globals),
            ConfigCommand::Init(args) => args.execute(),
        }
    }
}

/// Copy of the config safe to print.
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.github.token.is_some() {
        shown.github.token = Some("***".to_string());
    }
    shown
}

impl ConfigShowArgs {
    fn execute(&self, globals: &GlobalOptions) -> CliResult<()> {
        let config = redacted(&globals.load_config()?);

        if self.json {
            return print_json(&config);
        }

        match Config::locate(globals.config.as_deref()) {
            Some(path) => println!("# Loaded from {}", path.display()),
            None => println!("# No config file found, showing defaults"),
        }
        let text = toml::to_string_pretty(&config)
            .map_err(|e| CliError::io(format!("Failed to serialize configuration: {e}")))?;
        print!("{text}");
        Ok(())
    }
}

impl ConfigInitArgs {
    fn execute(&self) -> CliResult<()> {
        if self.path.exists() && !self.force {
            return Err(CliError::validation(format!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            )));
        }

        Config::default()
            .save_to(&self.path)
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        println!("✓ Wrote default configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_token() {
        let mut config = Config::default();
        assert_eq!(redacted(&config).github.token, None);

        config.github.token = Some("ghp_secret".to_string());
        assert_eq!(redacted(&config).github.token.as_deref(), Some("***"));
    }
}
