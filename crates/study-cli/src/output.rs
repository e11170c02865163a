//! Terminal rendering of subjects, export reports and messages

use colored::Colorize;
use std::fmt;
use study_core::error::StudyError;
use study_core::export::{month_label, ExportReport};
use study_core::i18n::Labels;
use study_core::subject::{Feedback, SubjectRecord};

/// Feedback sink printing repository messages to stderr
pub struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn error(&self, message: &str) {
        print_error(message);
    }

    fn success(&self, message: &str) {
        print_success(message);
    }
}

/// Repository failure that [`ConsoleFeedback`] has already printed
#[derive(Debug)]
pub struct Reported(StudyError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Propagate a repository error. Validation errors never reach the
/// feedback sink, so only they stay printable.
pub fn repo_error(err: StudyError) -> anyhow::Error {
    if err.is_validation() {
        err.into()
    } else {
        Reported(err).into()
    }
}

/// Print a command failure unless the feedback sink already did
pub fn print_failure(prefix: &str, err: &anyhow::Error) {
    if err.downcast_ref::<Reported>().is_none() {
        eprintln!("{}{:#}", prefix, err);
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Truncate to `width` characters, marking the cut with `…`
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// One line per subject: id, name, month, status, file count
pub fn print_table(records: &[SubjectRecord], labels: &Labels) {
    if records.is_empty() {
        println!("{}", labels.empty);
        return;
    }

    println!(
        "{}",
        format!(
            "{:>4}  {:<32}  {:<10}  {:<10}  {:>8}",
            labels.columns[0], labels.columns[1], labels.columns[3], labels.columns[4], labels.documents
        )
        .bold()
    );

    for record in records {
        let status = format!("{:<10}", labels.yes_no(record.completed));
        let status = if record.completed {
            status.green()
        } else {
            status.yellow()
        };
        println!(
            "{:>4}  {:<32}  {:<10}  {}  {:>8}",
            record.id.to_string().cyan(),
            fit(&record.name, 32),
            month_label(record.month, labels.language),
            status,
            record.file_count()
        );
    }
}

/// Every field of one subject, files listed one per line
pub fn print_detail(record: &SubjectRecord, labels: &Labels) {
    let columns = labels.columns;
    println!("{}", record.name.bold().underline());
    println!("  {}: {}", columns[0], record.id.to_string().cyan());
    println!("  {}: {}", columns[2], record.folder);
    println!("  {}: {}", columns[3], month_label(record.month, labels.language));
    println!("  {}: {}", columns[4], labels.yes_no(record.completed));
    println!(
        "  {}: {}",
        columns[5],
        record.instructor.as_deref().unwrap_or(labels.placeholder)
    );
    println!("  {}: {}", columns[6], record.created_at_display());
    println!(
        "  {}: {}",
        columns[7],
        record
            .completed_at_display()
            .unwrap_or_else(|| labels.placeholder.to_string())
    );
    println!("  {} ({}):", columns[8], record.file_count());
    for file in &record.files {
        println!("    - {}", file.dimmed());
    }
}

/// Print one line per written file and per skipped format
pub fn print_export_report(report: &ExportReport) {
    for path in report.written() {
        print_success(&format!("Exported to {}", path.display()));
    }
    for (format, err) in report.failures() {
        print_warning(&format!("Skipped '{}': {}", format, err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_marks_reported_failures() {
        let storage = repo_error(StudyError::storage("disk I/O error"));
        assert!(storage.downcast_ref::<Reported>().is_some());
        assert_eq!(storage.to_string(), "Storage error: disk I/O error");

        let validation = repo_error(StudyError::Validation(study_core::subject::InvalidField::Name));
        assert!(validation.downcast_ref::<Reported>().is_none());
        assert!(validation.downcast_ref::<StudyError>().is_some());
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("Cálculo", 10), "Cálculo");
        assert_eq!(fit("Cálculo Diferencial", 8), "Cálculo…");
        assert_eq!(fit("abc", 0), "…");
    }
}
