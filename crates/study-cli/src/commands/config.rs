//! Config command
//!
//! Manage study-tracker configuration.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use study_core::config::{Config, DEFAULT_CONFIG_FILE};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, path: Option<&Path>) -> Result<()> {
    let path = get_config_path(path);
    match cmd {
        ConfigCommand::Show { json } => show_config(&path, json),
        ConfigCommand::Init { force } => init_config(&path, force),
        ConfigCommand::Validate => validate_config(&path),
    }
}

fn get_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = Config::load_or_default(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", format!("{} (not found, defaults)", path.display()).dimmed());
    }
    println!();
    println!("{}", config.to_string_for(path)?);

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        println!(
            "{} No configuration at {}, built-in defaults apply.",
            "⚠".yellow(),
            path.display()
        );
        return Ok(());
    }

    let config = Config::load(path).with_context(|| format!("Invalid configuration {}", path.display()))?;
    println!("{} Configuration parses", "✓".green());

    let warnings = config.warnings();
    if warnings.is_empty() {
        println!("{} All values recognised", "✓".green());
    } else {
        for warning in warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
    }

    Ok(())
}
