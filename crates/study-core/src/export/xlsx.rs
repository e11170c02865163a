//! Spreadsheet exporter

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::{Result, StudyError};
use crate::subject::SubjectRecord;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// XLSX exporter: one worksheet named after the localised title, bold
/// header row, one row per subject
#[derive(Debug, Default)]
pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        Self
    }
}

fn xlsx_error(e: XlsxError) -> StudyError {
    StudyError::Render {
        format: "xlsx".to_string(),
        message: e.to_string(),
    }
}

impl Exporter for XlsxExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        // Worksheet names are capped at 31 characters
        let name: String = ctx.labels.title.chars().take(31).collect();

        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(xlsx_error)?;

        for (col, header) in ctx.labels.columns.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *header, &bold)
                .map_err(xlsx_error)?;
        }

        for (i, (record, row)) in records.iter().zip(ctx.rows(records)).enumerate() {
            let line = (i + 1) as u32;
            sheet
                .write_number(line, 0, record.id.0 as f64)
                .map_err(xlsx_error)?;
            for (col, cell) in row.cells().iter().enumerate().skip(1) {
                sheet
                    .write_string(line, col as u16, *cell)
                    .map_err(xlsx_error)?;
            }
        }

        sheet.autofit();

        workbook.save_to_buffer().map_err(xlsx_error)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }
}
