//! Plain text exporter

use super::exporter::{ExportFormat, Exporter};
use super::row::ExportContext;
use crate::error::Result;
use crate::subject::SubjectRecord;

/// Writes one `Label: value` block per subject, blocks separated by a blank line
pub struct TextExporter;

impl TextExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for TextExporter {
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>> {
        let mut output = String::new();

        if records.is_empty() {
            output.push_str(ctx.labels.empty);
            output.push('\n');
            return Ok(output.into_bytes());
        }

        for (i, row) in ctx.rows(records).iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            for (label, value) in ctx.labels.columns.iter().zip(row.cells()) {
                output.push_str(&format!("{}: {}\n", label, value));
            }
        }

        Ok(output.into_bytes())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Txt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::subject::sample_record;
    use crate::types::Month;
    use chrono::NaiveDate;

    fn ctx(language: Language) -> ExportContext {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        ExportContext::new(language, at)
    }

    #[test]
    fn test_text_blocks() {
        let records = vec![
            sample_record(1, "Cálculo", Month::January, false),
            sample_record(2, "Física", Month::February, true),
        ];
        let bytes = TextExporter::new().export(&records, &ctx(Language::Pt)).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("ID: 1\nNome: Cálculo (0 PDFs)\n"));
        assert!(blocks[1].contains("Concluída: Sim"));
        assert!(text.ends_with("Arquivos: -\n"));
    }

    #[test]
    fn test_text_empty() {
        let bytes = TextExporter::new().export(&[], &ctx(Language::En)).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "No subjects recorded.\n");
    }
}
