//! Shared state for command handlers: configuration, repository and exporters

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use study_core::config::{Config, DEFAULT_CONFIG_FILE};
use study_core::export::{ExportContext, ExportFormat, ExportManager, ExportReport};
use study_core::i18n::{Labels, Language};
use study_core::library;
use study_core::subject::{timestamp_now, SubjectRecord, SubjectRepository};
use study_storage::SqliteStore;
use tracing::{debug, warn};

use crate::output::ConsoleFeedback;

/// Everything a command needs, built once from the global flags
pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub repo: SubjectRepository,
    exports: ExportManager,
}

impl App {
    /// Load configuration and open the store
    pub fn load(config_path: Option<&Path>, database: Option<&str>) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Config::load_or_default(&config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
        if let Some(database) = database {
            config.database = database.to_string();
        }

        let store = match config.database_path() {
            Some(path) => SqliteStore::open(path),
            None => SqliteStore::default_location(),
        }
        .with_context(|| format!("Failed to open database '{}'", config.database))?;
        debug!("Using database {:?}", store.path());

        let repo = SubjectRepository::with_feedback(Arc::new(store), Arc::new(ConsoleFeedback))
            .with_document_extension(config.document_extension.clone());

        let exports = build_exports(&config);

        Ok(Self {
            config,
            config_path,
            repo,
            exports,
        })
    }

    pub fn language(&self) -> Language {
        self.config.language()
    }

    pub fn labels(&self) -> Labels {
        Labels::for_language(self.language())
    }

    /// Export context stamped with the current time
    pub fn export_context(&self) -> ExportContext {
        ExportContext::new(self.language(), timestamp_now())
            .with_annotation(self.config.export.annotate_file_count)
    }

    /// Formats this build can write
    pub fn available_formats(&self) -> Vec<ExportFormat> {
        self.exports.available_formats()
    }

    /// Export records to the given formats
    pub fn export<S: AsRef<str>>(
        &self,
        records: &[SubjectRecord],
        formats: &[S],
        dir: &Path,
        base_name: &str,
    ) -> ExportReport {
        self.exports
            .export_all(records, formats, dir, base_name, &self.export_context())
    }

    /// Export every subject with the configured formats
    pub fn export_configured(&self) -> ExportReport {
        let records = self.repo.list(None);
        let settings = &self.config.export;
        self.export(
            &records,
            settings.formats.as_slice(),
            &settings.directory,
            &settings.base_name,
        )
    }

    /// Export after a change when automatic export is on
    pub fn auto_export(&self) -> Option<ExportReport> {
        if self.config.export.auto {
            Some(self.export_configured())
        } else {
            None
        }
    }

    /// Auto-export and report the outcome after a change
    pub fn after_change(&self) {
        if let Some(report) = self.auto_export() {
            crate::output::print_export_report(&report);
        }
    }

    /// Copy a subject's documents into the library tree when one is configured.
    /// Failures are reported and never undo the insert.
    pub fn organize(&self, record: &SubjectRecord) -> Option<PathBuf> {
        let root = self.config.library_dir.as_ref()?;
        match library::organize(
            root,
            record.month,
            &record.name,
            Path::new(&record.folder),
            &record.files,
        ) {
            Ok((target, copied)) => {
                debug!("Organized {} documents into {:?}", copied, target);
                Some(target)
            }
            Err(e) => {
                warn!("Library organisation failed: {}", e);
                crate::output::print_error(&format!("Failed to organize documents: {}", e));
                None
            }
        }
    }
}

#[cfg(feature = "pdf")]
fn build_exports(config: &Config) -> ExportManager {
    use study_core::export::PdfExporter;

    let mut manager = ExportManager::new();
    manager.register(Box::new(PdfExporter::new(
        config.pdf.font_dir.clone(),
        config.pdf.font_family.clone(),
        config.pdf.rows_per_page,
    )));
    manager
}

#[cfg(not(feature = "pdf"))]
fn build_exports(_config: &Config) -> ExportManager {
    ExportManager::new()
}
