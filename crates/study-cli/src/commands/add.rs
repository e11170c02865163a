//! Add command
//!
//! Register a subject and attach the documents found in its folder.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use study_core::subject::NewSubject;

use crate::app::App;
use crate::output;

/// Arguments for the add command
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Subject name
    #[arg(long, short)]
    pub name: String,

    /// Folder holding the study material
    #[arg(long, short)]
    pub folder: String,

    /// Start month, e.g. "março", "march" or "3"
    #[arg(long, short)]
    pub month: String,

    /// Instructor name
    #[arg(long, short)]
    pub instructor: Option<String>,
}

impl AddArgs {
    pub fn into_new_subject(self) -> NewSubject {
        let subject = NewSubject::new(self.name, self.folder, self.month);
        match self.instructor {
            Some(instructor) => subject.with_instructor(instructor),
            None => subject,
        }
    }
}

/// Execute the add command
pub fn execute(app: &App, args: AddArgs) -> Result<()> {
    let record = app
        .repo
        .insert_with(args.into_new_subject())
        .map_err(output::repo_error)?;

    println!(
        "{} Subject {} '{}' added with {} document(s).",
        "✓".green(),
        record.id.to_string().cyan(),
        record.name,
        record.file_count().to_string().yellow()
    );

    if let Some(target) = app.organize(&record) {
        println!("  Documents copied to {}", target.display());
    }

    app.after_change();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_new_subject() {
        let args = AddArgs {
            name: "Cálculo".to_string(),
            folder: "/tmp/calc".to_string(),
            month: "março".to_string(),
            instructor: Some("Prof. Lima".to_string()),
        };
        let subject = args.into_new_subject();
        assert_eq!(subject.name, "Cálculo");
        assert_eq!(subject.instructor.as_deref(), Some("Prof. Lima"));
    }
}
