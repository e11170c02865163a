//! Remove command
//!
//! Delete one subject, or every subject with `--all`.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use study_core::error::StudyError;
use study_core::types::SubjectId;

use crate::app::App;

/// Arguments for the remove command
#[derive(Debug, Args)]
#[command(group = clap::ArgGroup::new("target").required(true).args(["id", "all"]))]
pub struct RemoveArgs {
    /// Subject ID
    pub id: Option<i64>,

    /// Remove every subject
    #[arg(long)]
    pub all: bool,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

fn confirm(prompt: String) -> Result<bool> {
    use dialoguer::Confirm;

    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Execute the remove command
pub fn execute(app: &App, args: RemoveArgs) -> Result<()> {
    if args.all {
        let count = app.repo.count();
        if count == 0 {
            println!("No subjects to remove.");
            return Ok(());
        }
        if !args.yes && !confirm(format!("Remove all {} subjects and their documents?", count))? {
            println!("Cancelled.");
            return Ok(());
        }

        let removed = app.repo.delete_all();
        println!("{} Removed {} subject(s).", "✓".green(), removed);
        app.after_change();
        return Ok(());
    }

    let Some(raw_id) = args.id else {
        bail!("Pass a subject ID or --all");
    };
    let id = SubjectId(raw_id);
    let Some(record) = app.repo.get(id) else {
        return Err(StudyError::NotFound(id).into());
    };

    if !args.yes && !confirm(format!("Remove '{}' (ID {})?", record.name, id))? {
        println!("Cancelled.");
        return Ok(());
    }

    if !app.repo.delete(id) {
        bail!("Subject {} could not be removed", id);
    }

    println!("{} Removed subject '{}' (ID {}).", "✓".green(), record.name, id);
    app.after_change();
    Ok(())
}
