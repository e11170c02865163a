//! Show command

use anyhow::Result;
use clap::Args;

use study_core::error::StudyError;
use study_core::types::SubjectId;

use crate::app::App;
use crate::output;

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Subject ID
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the show command
pub fn execute(app: &App, args: ShowArgs) -> Result<()> {
    let Some(record) = app.repo.get(SubjectId(args.id)) else {
        return Err(StudyError::NotFound(SubjectId(args.id)).into());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::print_detail(&record, &app.labels());
    }

    Ok(())
}
