//! Flattening of subject records into export rows

use crate::i18n::{Labels, Language};
use crate::subject::SubjectRecord;
use crate::types::{Month, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;

/// Settings shared by every exporter in one export run
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub labels: Labels,
    /// Append `(N PDFs)` to subject names
    pub annotate_file_count: bool,
    /// Stamped into formats that carry a generation time (markdown, pdf)
    pub generated_at: NaiveDateTime,
}

impl ExportContext {
    pub fn new(language: Language, generated_at: NaiveDateTime) -> Self {
        Self {
            labels: Labels::for_language(language),
            annotate_file_count: true,
            generated_at,
        }
    }

    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate_file_count = annotate;
        self
    }

    pub fn generated_at_display(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Flatten every record
    pub fn rows(&self, records: &[SubjectRecord]) -> Vec<ExportRow> {
        records.iter().map(|r| ExportRow::new(r, self)).collect()
    }
}

/// One subject as a fixed tuple of display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub folder: String,
    pub month: String,
    pub completed: String,
    pub instructor: String,
    pub created_at: String,
    pub completed_at: String,
    pub files: String,
}

impl ExportRow {
    pub fn new(record: &SubjectRecord, ctx: &ExportContext) -> Self {
        let labels = &ctx.labels;
        let name = if ctx.annotate_file_count {
            format!("{} ({} {})", record.name, record.file_count(), labels.documents)
        } else {
            record.name.clone()
        };

        Self {
            id: record.id.to_string(),
            name,
            folder: record.folder.clone(),
            month: month_label(record.month, labels.language),
            completed: labels.yes_no(record.completed).to_string(),
            instructor: record
                .instructor
                .clone()
                .unwrap_or_else(|| labels.placeholder.to_string()),
            created_at: record.created_at_display(),
            completed_at: record
                .completed_at_display()
                .unwrap_or_else(|| labels.placeholder.to_string()),
            files: if record.files.is_empty() {
                labels.placeholder.to_string()
            } else {
                record.files.join("; ")
            },
        }
    }

    /// Cells in column order
    pub fn cells(&self) -> [&str; 9] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.folder.as_str(),
            self.month.as_str(),
            self.completed.as_str(),
            self.instructor.as_str(),
            self.created_at.as_str(),
            self.completed_at.as_str(),
            self.files.as_str(),
        ]
    }
}

/// Capitalised month name in the given language
pub fn month_label(month: Month, language: Language) -> String {
    let name = match language {
        Language::Pt => month.canonical(),
        Language::En => month.english(),
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
