//! Export of subject lists to files
//!
//! Every format renders the same flattened rows (see [`ExportRow`]) so the
//! column set and order is identical across csv, txt, md, json, xlsx and pdf.
//!
//! # Example
//!
//! ```ignore
//! use study_core::export::{ExportContext, ExportManager};
//!
//! let manager = ExportManager::new();
//! let ctx = ExportContext::new(Language::Pt, timestamp_now());
//! let report = manager.export_all(&records, &["csv", "pdf"], dir, "materias", &ctx);
//! for failure in report.failures() { eprintln!("{}", failure); }
//! ```

mod delimited;
mod exporter;
mod json;
mod markdown;
#[cfg(feature = "pdf")]
mod pdf;
mod row;
mod text;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use delimited::CsvExporter;
pub use exporter::{ExportFormat, ExportManager, ExportOutcome, ExportReport, Exporter};
pub use json::{ExportData, ExportSubject, JsonExporter};
pub use markdown::MarkdownExporter;
#[cfg(feature = "pdf")]
pub use pdf::{PdfExporter, DEFAULT_FONT_DIR, DEFAULT_FONT_FAMILY, DEFAULT_ROWS_PER_PAGE};
pub use row::{month_label, ExportContext, ExportRow};
pub use text::TextExporter;
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxExporter;
