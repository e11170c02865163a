//! JSON exporter for subjects

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::Result;
use crate::subject::SubjectRecord;
use serde::{Deserialize, Serialize};

/// JSON exporter. Output carries no wall-clock fields, so the same records
/// always serialize to the same bytes.
pub struct JsonExporter {
    /// Whether to use pretty-print formatting
    pretty: bool,
}

impl JsonExporter {
    /// Create a new pretty-printing JSON exporter
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON exporter
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JsonExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let data = ExportData::from_records(records, ctx);

        let mut json = if self.pretty {
            serde_json::to_vec_pretty(&data)?
        } else {
            serde_json::to_vec(&data)?
        };
        json.push(b'\n');

        Ok(json)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

/// Exported document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    /// Language of the label fields
    pub language: String,
    /// Number of subjects
    pub count: usize,
    pub subjects: Vec<ExportSubject>,
}

impl ExportData {
    pub fn from_records(records: &[SubjectRecord], ctx: &ExportContext) -> Self {
        Self {
            language: ctx.labels.language.code().to_string(),
            count: records.len(),
            subjects: records
                .iter()
                .map(|r| ExportSubject::from_record(r, ctx))
                .collect(),
        }
    }
}

/// Exported subject with its nested file list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSubject {
    pub id: i64,
    pub name: String,
    pub folder: String,
    /// Canonical month name
    pub month: String,
    pub completed: bool,
    /// Localised yes/no
    pub completed_label: String,
    pub instructor: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub file_count: usize,
    pub files: Vec<String>,
}

impl ExportSubject {
    pub fn from_record(record: &SubjectRecord, ctx: &ExportContext) -> Self {
        Self {
            id: record.id.0,
            name: record.name.clone(),
            folder: record.folder.clone(),
            month: record.month.canonical().to_string(),
            completed: record.completed,
            completed_label: ctx.labels.yes_no(record.completed).to_string(),
            instructor: record.instructor.clone(),
            created_at: record.created_at_display(),
            completed_at: record.completed_at_display(),
            file_count: record.file_count(),
            files: record.files.clone(),
        }
    }
}
