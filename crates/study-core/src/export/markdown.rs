//! Markdown exporter for subjects

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::Result;
use crate::subject::SubjectRecord;

/// Markdown exporter
pub struct MarkdownExporter {
    /// Include the generation timestamp line
    include_timestamp: bool,
    /// Include the completed/pending summary
    include_summary: bool,
}

impl MarkdownExporter {
    /// Create a new Markdown exporter with default settings
    pub fn new() -> Self {
        Self {
            include_timestamp: true,
            include_summary: true,
        }
    }

    /// Set whether to include the generation timestamp
    pub fn with_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Set whether to include the summary line
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    /// Render the report header
    fn render_header(&self, ctx: &ExportContext) -> String {
        let mut header = String::new();
        header.push_str(&format!("# {}\n\n", ctx.labels.title));

        if self.include_timestamp {
            header.push_str(&format!(
                "_{}: {}_\n\n",
                ctx.labels.generated_at,
                ctx.generated_at_display()
            ));
        }

        header
    }

    /// Render the summary line
    fn render_summary(&self, records: &[SubjectRecord], ctx: &ExportContext) -> String {
        if !self.include_summary || records.is_empty() {
            return String::new();
        }

        let done = records.iter().filter(|r| r.completed).count();
        let labels = &ctx.labels;
        format!(
            "- **{}:** {}\n- **{} ({}):** {}\n- **{} ({}):** {}\n\n",
            labels.records,
            records.len(),
            labels.columns[4],
            labels.yes,
            done,
            labels.columns[4],
            labels.no,
            records.len() - done
        )
    }

    /// Render the subject table
    fn render_table(&self, records: &[SubjectRecord], ctx: &ExportContext) -> String {
        if records.is_empty() {
            return format!("{}\n", ctx.labels.empty);
        }

        let mut table = String::new();
        table.push_str(&table_line(ctx.labels.columns));
        table.push_str(&format!("|{}\n", "---|".repeat(ctx.labels.columns.len())));

        for row in ctx.rows(records) {
            table.push_str(&table_line(row.cells()));
        }

        table
    }
}

fn table_line(cells: [&str; 9]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// Keep pipes and line breaks from breaking the table
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for MarkdownExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let mut output = String::new();

        output.push_str(&self.render_header(ctx));
        output.push_str(&self.render_summary(records, ctx));
        output.push_str(&self.render_table(records, ctx));

        Ok(output.into_bytes())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }
}
