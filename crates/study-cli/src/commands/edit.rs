//! Edit command
//!
//! Change a subject in place. The ID never changes; a new folder is rescanned.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use study_core::error::StudyError;
use study_core::subject::SubjectEdit;
use study_core::types::SubjectId;

use crate::app::App;
use crate::output;

/// Arguments for the edit command
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Subject ID
    pub id: i64,

    /// New name
    #[arg(long, short)]
    pub name: Option<String>,

    /// New folder, rescanned for documents
    #[arg(long, short)]
    pub folder: Option<String>,

    /// New start month
    #[arg(long, short)]
    pub month: Option<String>,

    /// New instructor, empty to clear
    #[arg(long, short)]
    pub instructor: Option<String>,
}

impl EditArgs {
    pub fn edit(&self) -> SubjectEdit {
        SubjectEdit {
            name: self.name.clone(),
            folder: self.folder.clone(),
            month: self.month.clone(),
            instructor: self.instructor.clone(),
        }
    }
}

/// Execute the edit command
pub fn execute(app: &App, args: EditArgs) -> Result<()> {
    let edit = args.edit();
    if edit.is_empty() {
        bail!("Nothing to change. Pass at least one of --name, --folder, --month, --instructor");
    }

    let Some(record) = app
        .repo
        .update(SubjectId(args.id), edit)
        .map_err(output::repo_error)?
    else {
        return Err(StudyError::NotFound(SubjectId(args.id)).into());
    };

    println!(
        "{} Subject {} updated: '{}', {}, {} document(s).",
        "✓".green(),
        record.id.to_string().cyan(),
        record.name,
        record.month,
        record.file_count()
    );

    app.after_change();
    Ok(())
}
