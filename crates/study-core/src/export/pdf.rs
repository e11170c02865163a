//! Paginated PDF exporter

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::{Result, StudyError};
use crate::subject::SubjectRecord;
use genpdf::elements::{Break, FrameCellDecorator, PageBreak, Paragraph, TableLayout};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::path::PathBuf;

const MARGIN_MM: i32 = 10;
const FONT_SIZE_PT: u8 = 8;
/// Relative column widths, in export column order
const COLUMN_WEIGHTS: [usize; 9] = [1, 4, 4, 2, 2, 3, 3, 3, 5];

pub const DEFAULT_FONT_DIR: &str = "./fonts";
pub const DEFAULT_FONT_FAMILY: &str = "LiberationSans";
pub const DEFAULT_ROWS_PER_PAGE: usize = 20;

/// Landscape table of subjects, `rows_per_page` rows per page, each page
/// ending with a `Página p | registros a-b de n` footer line.
pub struct PdfExporter {
    font_dir: PathBuf,
    font_family: String,
    rows_per_page: usize,
}

impl PdfExporter {
    pub fn new(
        font_dir: impl Into<PathBuf>,
        font_family: impl Into<String>,
        rows_per_page: usize,
    ) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    fn load_fonts(&self) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>> {
        genpdf::fonts::from_files(&self.font_dir, &self.font_family, None).map_err(|e| {
            render_error(format!(
                "cannot load font family '{}' from {}: {}",
                self.font_family,
                self.font_dir.display(),
                e
            ))
        })
    }

    fn header_row(table: &mut TableLayout, ctx: &ExportContext) -> Result<()> {
        let mut row = table.row();
        for header in ctx.labels.columns {
            row.push_element(Paragraph::new(StyledString::new(
                header,
                Style::new().bold(),
            )));
        }
        row.push().map_err(render_error)
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_DIR, DEFAULT_FONT_FAMILY, DEFAULT_ROWS_PER_PAGE)
    }
}

fn render_error(e: impl std::fmt::Display) -> StudyError {
    StudyError::Render {
        format: "pdf".to_string(),
        message: e.to_string(),
    }
}

/// Page ranges as `(page, first, last)`, 1-based and inclusive
pub fn page_ranges(total: usize, rows_per_page: usize) -> Vec<(usize, usize, usize)> {
    let per_page = rows_per_page.max(1);
    (0..total)
        .step_by(per_page)
        .enumerate()
        .map(|(page, start)| (page + 1, start + 1, (start + per_page).min(total)))
        .collect()
}

/// Footer line for one page
pub fn footer_text(ctx: &ExportContext, page: usize, first: usize, last: usize, total: usize) -> String {
    let labels = &ctx.labels;
    format!(
        "{} {} | {} {}-{} {} {}",
        labels.page, page, labels.records, first, last, labels.of, total
    )
}

impl Exporter for PdfExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let fonts = self.load_fonts()?;

        let mut doc = Document::new(fonts);
        doc.set_title(ctx.labels.title);
        doc.set_font_size(FONT_SIZE_PT);
        doc.set_paper_size(genpdf::Size::new(297.0, 210.0));

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM);
        doc.set_page_decorator(decorator);

        doc.push(Paragraph::new(StyledString::new(
            ctx.labels.title,
            Style::new().bold().with_font_size(14),
        )));
        doc.push(Paragraph::new(format!(
            "{}: {}",
            ctx.labels.generated_at,
            ctx.generated_at_display()
        )));
        doc.push(Break::new(1));

        if records.is_empty() {
            doc.push(Paragraph::new(ctx.labels.empty));
        }

        let rows = ctx.rows(records);
        let total = rows.len();

        for (page, first, last) in page_ranges(total, self.rows_per_page) {
            if page > 1 {
                doc.push(PageBreak::new());
            }

            let mut table = TableLayout::new(COLUMN_WEIGHTS.to_vec());
            table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
            Self::header_row(&mut table, ctx)?;

            for row in &rows[first - 1..last] {
                let mut line = table.row();
                for cell in row.cells() {
                    line.push_element(Paragraph::new(cell));
                }
                line.push().map_err(render_error)?;
            }

            doc.push(table);
            doc.push(Break::new(1));
            doc.push(Paragraph::new(footer_text(ctx, page, first, last, total)));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(render_error)?;
        Ok(buffer)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }
}
