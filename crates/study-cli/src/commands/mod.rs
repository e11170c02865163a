//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod add;
pub mod complete;
pub mod config;
pub mod edit;
pub mod export;
pub mod list;
pub mod menu;
pub mod remove;
pub mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::app::App;

/// study - track subjects and their study material
#[derive(Debug, Parser)]
#[command(name = "study")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path (JSON, or TOML by extension)
    #[arg(short, long, global = true, env = "STUDY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database connection string, overrides the configuration
    #[arg(long, global = true, env = "STUDY_DATABASE")]
    pub database: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive menu
    Menu,

    /// Add a subject and attach the documents found in its folder
    Add(add::AddArgs),

    /// List subjects
    List(list::ListArgs),

    /// Show one subject with its documents
    Show(show::ShowArgs),

    /// Mark a subject as completed (or not)
    Complete(complete::CompleteArgs),

    /// Edit a subject in place
    Edit(edit::EditArgs),

    /// Remove one subject, or all of them
    Remove(remove::RemoveArgs),

    /// Export subjects to files
    Export(export::ExportArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
    }

    // Opened lazily, config commands never touch the store
    let load = || App::load(cli.config.as_deref(), cli.database.as_deref());

    match cli.command {
        Some(Commands::Config(cmd)) => config::execute(cmd, cli.config.as_deref()),
        None | Some(Commands::Menu) => menu::execute(&load()?),
        Some(Commands::Add(args)) => add::execute(&load()?, args),
        Some(Commands::List(args)) => list::execute(&load()?, args),
        Some(Commands::Show(args)) => show::execute(&load()?, args),
        Some(Commands::Complete(args)) => complete::execute(&load()?, args),
        Some(Commands::Edit(args)) => edit::execute(&load()?, args),
        Some(Commands::Remove(args)) => remove::execute(&load()?, args),
        Some(Commands::Export(args)) => export::execute(&load()?, args),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_no_subcommand_is_menu() {
        let cli = Cli::try_parse_from(["study"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["study", "list", "--database", "x.db", "-vv"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("x.db"));
        assert_eq!(cli.verbose, 2);
    }
}
