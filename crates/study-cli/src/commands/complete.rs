//! Complete command
//!
//! Mark a subject as completed, or back to pending with `--undo`.

use anyhow::{bail, Result};
use clap::Args;

use study_core::error::StudyError;
use study_core::types::SubjectId;

use crate::app::App;

/// Arguments for the complete command
#[derive(Debug, Args)]
pub struct CompleteArgs {
    /// Subject ID
    pub id: i64,

    /// Mark as not completed instead
    #[arg(long)]
    pub undo: bool,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the complete command
pub fn execute(app: &App, args: CompleteArgs) -> Result<()> {
    let id = SubjectId(args.id);
    let Some(record) = app.repo.get(id) else {
        return Err(StudyError::NotFound(id).into());
    };

    let completed = !args.undo;
    if record.completed == completed {
        println!(
            "Subject '{}' is already {}.",
            record.name,
            if completed { "completed" } else { "pending" }
        );
        return Ok(());
    }

    if !args.yes {
        use dialoguer::Confirm;

        let prompt = if completed {
            format!("Mark '{}' as completed?", record.name)
        } else {
            format!("Mark '{}' as not completed?", record.name)
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    // Success is reported by the repository's feedback sink
    if app.repo.update_completion(id, completed).is_none() {
        bail!("Subject {} could not be updated", id);
    }

    app.after_change();
    Ok(())
}
