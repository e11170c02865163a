//! Configuration management for study-tracker
//!
//! The configuration file is JSON by default (`study.json`); a `.toml`
//! extension switches the parser. Every key is optional.

use crate::error::{Result, StudyError};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "study.json";

/// Menu entries whose labels can be overridden
pub const MENU_KEYS: [&str; 11] = [
    "title",
    "add",
    "show",
    "list_month",
    "list_done",
    "list_pending",
    "mark_done",
    "edit",
    "remove",
    "export",
    "exit",
];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection string: `sqlite://<path>`, `sqlite:<path>` or a bare path
    pub database: String,
    /// Language code, `pt` or `en`
    pub language: String,
    /// Files ending in this extension are picked up by folder scans
    pub document_extension: String,
    /// When set, added documents are copied under `<library_dir>/<month>/<subject>/`
    pub library_dir: Option<PathBuf>,
    /// Export settings
    pub export: ExportConfig,
    /// PDF renderer settings
    pub pdf: PdfConfig,
    /// Menu label overrides by key
    pub menu: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "sqlite://estudos.db".to_string(),
            language: Language::Pt.code().to_string(),
            document_extension: ".pdf".to_string(),
            library_dir: None,
            export: ExportConfig::default(),
            pdf: PdfConfig::default(),
            menu: HashMap::new(),
        }
    }
}

/// Export-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Formats written by `export` and by automatic exports
    pub formats: Vec<String>,
    /// Output directory
    pub directory: PathBuf,
    /// File name without extension
    pub base_name: String,
    /// Append the document count to subject names
    pub annotate_file_count: bool,
    /// Export after every change made from the menu
    pub auto: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            formats: vec![
                "csv".to_string(),
                "json".to_string(),
                "md".to_string(),
                "txt".to_string(),
            ],
            directory: PathBuf::from("export"),
            base_name: "materias".to_string(),
            annotate_file_count: true,
            auto: true,
        }
    }
}

/// PDF-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Directory holding the TTF files of `font_family`
    pub font_dir: PathBuf,
    /// Font family name, files are `<family>-Regular.ttf` and so on
    pub font_family: String,
    /// Table rows per page
    pub rows_per_page: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            rows_per_page: 20,
        }
    }
}

impl Config {
    /// Load configuration from a file, picking the parser by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| StudyError::filesystem(path, e))?;

        let config = if is_toml(path) {
            toml::from_str(&content).map_err(|e| StudyError::Toml(e.to_string()))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| StudyError::Config(format!("{}: {}", path.display(), e)))?
        };

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Serialize in the format matching the path's extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        if is_toml(path) {
            toml::to_string_pretty(self).map_err(|e| StudyError::Toml(e.to_string()))
        } else {
            Ok(serde_json::to_string_pretty(self)?)
        }
    }

    /// Write the configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StudyError::filesystem(parent, e))?;
        }
        fs::write(path, content).map_err(|e| StudyError::filesystem(path, e))
    }

    /// Configured language; unknown codes fall back to Portuguese
    pub fn language(&self) -> Language {
        self.language.parse().unwrap_or_else(|e| {
            warn!("{}, falling back to '{}'", e, Language::Pt);
            Language::Pt
        })
    }

    /// Database file path with any `sqlite:` scheme removed, `None` when
    /// no path is given and the per-user default applies
    pub fn database_path(&self) -> Option<PathBuf> {
        Some(parse_database_url(&self.database)).filter(|p| !p.as_os_str().is_empty())
    }

    /// Label for a menu entry, if overridden
    pub fn menu_label(&self, key: &str) -> Option<&str> {
        self.menu.get(key).map(|s| s.as_str())
    }

    /// Problems that do not prevent loading but are worth reporting
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.language.parse::<Language>().is_err() {
            warnings.push(format!("unknown language '{}'", self.language));
        }
        if !self.document_extension.starts_with('.') {
            warnings.push(format!(
                "document_extension '{}' does not start with '.'",
                self.document_extension
            ));
        }
        for format in &self.export.formats {
            if format.parse::<crate::export::ExportFormat>().is_err() {
                warnings.push(format!("unknown export format '{}'", format));
            }
        }
        if self.pdf.rows_per_page == 0 {
            warnings.push("pdf.rows_per_page must be at least 1".to_string());
        }
        for key in self.menu.keys() {
            if !MENU_KEYS.contains(&key.as_str()) {
                warnings.push(format!("unknown menu key '{}'", key));
            }
        }

        warnings
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Strip a `sqlite://` or `sqlite:` prefix from a connection string
pub fn parse_database_url(url: &str) -> PathBuf {
    let url = url.trim();
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language(), Language::Pt);
        assert_eq!(config.database_path(), Some(PathBuf::from("estudos.db")));
        assert_eq!(config.export.base_name, "materias");
        assert!(config.export.auto);
        assert_eq!(config.pdf.rows_per_page, 20);
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("study.json");
        fs::write(
            &path,
            r#"{ "language": "en", "export": { "formats": ["pdf"] }, "menu": { "add": "New" } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.language(), Language::En);
        assert_eq!(config.export.formats, vec!["pdf".to_string()]);
        assert_eq!(config.export.base_name, "materias");
        assert_eq!(config.menu_label("add"), Some("New"));
        assert_eq!(config.menu_label("exit"), None);
    }

    #[test]
    fn test_toml_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("study.toml");
        fs::write(&path, "database = \"sqlite:/tmp/x.db\"\n\n[pdf]\nrows_per_page = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database_path(), Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(config.pdf.rows_per_page, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("study.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(StudyError::Config(_))));
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("study.json");
        let mut config = Config::default();
        config.library_dir = Some(PathBuf::from("/library"));

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let config = Config {
            language: "fr".to_string(),
            ..Config::default()
        };
        assert_eq!(config.language(), Language::Pt);
        assert_eq!(config.warnings(), vec!["unknown language 'fr'".to_string()]);
    }

    #[test]
    fn test_warnings() {
        let mut config = Config::default();
        config.export.formats.push("docx".to_string());
        config.menu.insert("quit".to_string(), "Sair".to_string());
        config.document_extension = "pdf".to_string();

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("docx")));
        assert!(warnings.iter().any(|w| w.contains("quit")));
    }

    #[test]
    fn test_empty_database_means_default_location() {
        for database in ["", "  ", "sqlite://"] {
            let config = Config {
                database: database.to_string(),
                ..Config::default()
            };
            assert_eq!(config.database_path(), None);
            assert!(config.warnings().is_empty());
        }
    }

    #[test]
    fn test_parse_database_url() {
        assert_eq!(parse_database_url("sqlite://estudos.db"), PathBuf::from("estudos.db"));
        assert_eq!(parse_database_url("sqlite:data/x.db"), PathBuf::from("data/x.db"));
        assert_eq!(parse_database_url(" plain.db "), PathBuf::from("plain.db"));
    }
}
