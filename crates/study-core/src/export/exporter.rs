//! Exporter trait and manager

use super::row::ExportContext;
use crate::error::{Result, StudyError};
use crate::library::normalize_file_name;
use crate::subject::SubjectRecord;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportFormat {
    /// Delimited text
    Csv,
    /// One block of `Label: value` lines per subject
    Txt,
    /// Markdown table
    Markdown,
    /// Full structure with nested file lists
    Json,
    /// Spreadsheet
    Xlsx,
    /// Paginated document
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Csv,
        ExportFormat::Txt,
        ExportFormat::Markdown,
        ExportFormat::Json,
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
    ];

    /// Canonical identifier
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(StudyError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

/// Trait for subject exporters
pub trait Exporter: Send + Sync {
    /// Render the records to bytes
    fn export(&self, records: &[SubjectRecord], ctx: &ExportContext) -> Result<Vec<u8>>;

    /// Format produced by this exporter
    fn format(&self) -> ExportFormat;

    /// Get the file extension
    fn file_extension(&self) -> &str {
        self.format().extension()
    }
}

/// Result of exporting to one format
#[derive(Debug)]
pub struct ExportOutcome {
    /// Identifier as requested
    pub format: String,
    /// Written file, or why the format was skipped
    pub result: Result<PathBuf>,
}

/// Per-format results of one export run
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    /// Paths of every file written
    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|p| p.as_path()))
            .collect()
    }

    /// Formats that failed, with their errors
    pub fn failures(&self) -> Vec<(&str, &StudyError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.format.as_str(), e)))
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Manager for handling multiple export formats
pub struct ExportManager {
    exporters: HashMap<ExportFormat, Box<dyn Exporter>>,
}

impl ExportManager {
    /// Create a manager with every exporter this build supports
    pub fn new() -> Self {
        let mut manager = Self::empty();

        manager.register(Box::new(super::delimited::CsvExporter::new()));
        manager.register(Box::new(super::text::TextExporter::new()));
        manager.register(Box::new(super::markdown::MarkdownExporter::new()));
        manager.register(Box::new(super::json::JsonExporter::new()));
        #[cfg(feature = "xlsx")]
        manager.register(Box::new(super::xlsx::XlsxExporter::new()));
        #[cfg(feature = "pdf")]
        manager.register(Box::new(super::pdf::PdfExporter::default()));

        manager
    }

    /// Create a manager without any exporter
    pub fn empty() -> Self {
        Self {
            exporters: HashMap::new(),
        }
    }

    /// Register a new exporter, replacing any for the same format
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.insert(exporter.format(), exporter);
    }

    /// Check if a format is available
    pub fn has_format(&self, format: ExportFormat) -> bool {
        self.exporters.contains_key(&format)
    }

    /// Formats available in this build, in a stable order
    pub fn available_formats(&self) -> Vec<ExportFormat> {
        let mut formats: Vec<_> = self.exporters.keys().copied().collect();
        formats.sort();
        formats
    }

    /// Render records in one format
    pub fn render(
        &self,
        records: &[SubjectRecord],
        format: ExportFormat,
        ctx: &ExportContext,
    ) -> Result<Vec<u8>> {
        let exporter = self.exporters.get(&format).ok_or_else(|| {
            StudyError::UnsupportedFormat(format!("{} (not enabled in this build)", format))
        })?;
        exporter.export(records, ctx)
    }

    /// Export records to `<dir>/<base_name>.<ext>` for every requested
    /// format. Each format succeeds or fails on its own.
    pub fn export_all<S: AsRef<str>>(
        &self,
        records: &[SubjectRecord],
        formats: &[S],
        dir: &Path,
        base_name: &str,
        ctx: &ExportContext,
    ) -> ExportReport {
        let mut report = ExportReport::default();

        let dir_ready = fs::create_dir_all(dir);
        let base = normalize_file_name(base_name);

        for requested in formats {
            let requested = requested.as_ref();
            let result = match &dir_ready {
                Err(e) => Err(StudyError::filesystem(
                    dir,
                    std::io::Error::new(e.kind(), e.to_string()),
                )),
                Ok(()) => requested
                    .parse::<ExportFormat>()
                    .and_then(|format| self.export_to_file(records, format, dir, &base, ctx)),
            };

            match &result {
                Ok(path) => info!("Exported {} subjects to {:?}", records.len(), path),
                Err(e) => warn!("Export to '{}' skipped: {}", requested, e),
            }

            report.outcomes.push(ExportOutcome {
                format: requested.to_string(),
                result,
            });
        }

        report
    }

    /// Render one format and write it atomically
    pub fn export_to_file(
        &self,
        records: &[SubjectRecord],
        format: ExportFormat,
        dir: &Path,
        base_name: &str,
        ctx: &ExportContext,
    ) -> Result<PathBuf> {
        let content = self.render(records, format, ctx)?;
        let final_path = dir.join(format!("{}.{}", base_name, format.extension()));

        // Atomic write using temp file
        let temp_path = final_path.with_extension(format!("{}.tmp", format.extension()));
        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| StudyError::filesystem(&temp_path, e))?;
            file.write_all(&content)
                .and_then(|_| file.flush())
                .map_err(|e| StudyError::filesystem(&temp_path, e))?;
        }

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StudyError::filesystem(&final_path, e)
        })?;

        debug!("Wrote {} bytes to {:?}", content.len(), final_path);
        Ok(final_path)
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::subject::sample_record;
    use crate::types::Month;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn export(&self, _records: &[SubjectRecord], _ctx: &ExportContext) -> Result<Vec<u8>> {
            Err(StudyError::Render {
                format: "txt".to_string(),
                message: "boom".to_string(),
            })
        }

        fn format(&self) -> ExportFormat {
            ExportFormat::Txt
        }
    }

    fn ctx() -> ExportContext {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        ExportContext::new(Language::Pt, at)
    }

    fn records() -> Vec<SubjectRecord> {
        let mut record = sample_record(1, "Cálculo Diferencial", Month::February, false);
        record.files = vec!["limites.pdf".into()];
        vec![record]
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(StudyError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_manager_has_text_formats() {
        let manager = ExportManager::new();
        for format in [
            ExportFormat::Csv,
            ExportFormat::Txt,
            ExportFormat::Markdown,
            ExportFormat::Json,
        ] {
            assert!(manager.has_format(format));
        }
    }

    #[test]
    fn test_available_formats_are_sorted() {
        let formats = ExportManager::new().available_formats();
        let mut sorted = formats.clone();
        sorted.sort();
        assert_eq!(formats, sorted);
        assert!(formats.contains(&ExportFormat::Csv));
        assert_eq!(formats.len(), ExportManager::new().exporters.len());
    }

    #[test]
    fn test_export_three_formats_contain_name() {
        let dir = TempDir::new().unwrap();
        let manager = ExportManager::new();
        let report = manager.export_all(
            &records(),
            &["csv", "json", "md"],
            &dir.path().join("export"),
            "materias",
            &ctx(),
        );

        assert!(report.all_succeeded());
        assert_eq!(report.written().len(), 3);
        for ext in ["csv", "json", "md"] {
            let path = dir.path().join("export").join(format!("materias.{}", ext));
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.contains("Cálculo Diferencial"), "{} missing name", ext);
        }
    }

    #[test]
    fn test_reexport_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let manager = ExportManager::new();

        manager.export_all(&records(), &["csv", "json"], dir.path(), "materias", &ctx());
        let csv_first = fs::read(dir.path().join("materias.csv")).unwrap();
        let json_first = fs::read(dir.path().join("materias.json")).unwrap();

        let mut later = ctx();
        later.generated_at += chrono::Duration::hours(3);
        manager.export_all(&records(), &["csv", "json"], dir.path(), "materias", &later);

        assert_eq!(fs::read(dir.path().join("materias.csv")).unwrap(), csv_first);
        assert_eq!(fs::read(dir.path().join("materias.json")).unwrap(), json_first);
    }

    #[test]
    fn test_unknown_and_failing_formats_do_not_block_others() {
        let dir = TempDir::new().unwrap();
        let mut manager = ExportManager::new();
        manager.register(Box::new(FailingExporter));

        let report = manager.export_all(&records(), &["docx", "txt", "csv"], dir.path(), "out", &ctx());

        let failures = report.failures();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0].1, StudyError::UnsupportedFormat(_)));
        assert!(matches!(failures[1].1, StudyError::Render { .. }));
        assert!(dir.path().join("out.csv").exists());
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_unregistered_format_is_unsupported() {
        let manager = ExportManager::empty();
        let err = manager.render(&records(), ExportFormat::Csv, &ctx()).unwrap_err();
        assert!(matches!(err, StudyError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_base_name_is_normalized() {
        let dir = TempDir::new().unwrap();
        let manager = ExportManager::new();
        let report = manager.export_all(&records(), &["csv"], dir.path(), "minhas:materias", &ctx());
        assert!(report.all_succeeded());
        assert!(dir.path().join("minhas_materias.csv").exists());
    }
}
