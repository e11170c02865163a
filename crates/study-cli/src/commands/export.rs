//! Export command
//!
//! Export subjects to one or more file formats.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use study_core::subject::SubjectFilter;

use crate::app::App;
use crate::output;

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Format to write (csv, txt, md, json, xlsx, pdf); repeatable.
    /// Defaults to the configured formats.
    #[arg(long, short, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Output directory (defaults to the configured one)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// File name without extension
    #[arg(long)]
    pub base_name: Option<String>,

    /// Only completed subjects
    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,

    /// Only pending subjects
    #[arg(long)]
    pub pending: bool,
}

impl ExportArgs {
    fn completed_filter(&self) -> Option<bool> {
        match (self.completed, self.pending) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Execute the export command
pub fn execute(app: &App, args: ExportArgs) -> Result<()> {
    use colored::Colorize;

    let settings = &app.config.export;
    let formats = if args.format.is_empty() {
        settings.formats.clone()
    } else {
        args.format.clone()
    };
    let dir = args.output.clone().unwrap_or_else(|| settings.directory.clone());
    let base_name = args
        .base_name
        .clone()
        .unwrap_or_else(|| settings.base_name.clone());

    let records = app
        .repo
        .search(&SubjectFilter::completed(args.completed_filter()));

    eprintln!(
        "Exporting {} subject(s) to {}...",
        records.len().to_string().yellow(),
        dir.display().to_string().cyan()
    );

    let report = app.export(&records, formats.as_slice(), &dir, &base_name);
    output::print_export_report(&report);

    if report.written().is_empty() {
        bail!("No export file was written");
    }
    Ok(())
}
