//! CSV exporter

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::{Result, StudyError};
use crate::subject::SubjectRecord;

/// CSV exporter: one header row, one row per subject
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use another field delimiter, e.g. `;` for spreadsheet locales that
    /// read commas as decimal separators
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: impl std::fmt::Display) -> StudyError {
    StudyError::Render {
        format: "csv".to_string(),
        message: e.to_string(),
    }
}

impl Exporter for CsvExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(ctx.labels.columns).map_err(csv_error)?;
        for row in ctx.rows(records) {
            writer.write_record(row.cells()).map_err(csv_error)?;
        }

        writer.into_inner().map_err(csv_error)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}
