//! SQLite storage for subjects

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use study_core::error::{Result, StudyError};
use study_core::subject::{
    SubjectChanges, SubjectDraft, SubjectFilter, SubjectRecord, SubjectStore,
};
use study_core::types::{Month, SubjectId, TIMESTAMP_FORMAT};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS subjects (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    folder       TEXT NOT NULL,
    month        TEXT NOT NULL,
    completed    INTEGER NOT NULL DEFAULT 0,
    instructor   TEXT NULL,
    created_at   TEXT NOT NULL,
    completed_at TEXT NULL
);
CREATE TABLE IF NOT EXISTS source_files (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
    file_name  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_subjects_month ON subjects(month);
CREATE INDEX IF NOT EXISTS idx_subjects_completed ON subjects(completed);
CREATE INDEX IF NOT EXISTS idx_source_files_subject ON source_files(subject_id);
";

/// File name used inside the per-user data directory
pub const DEFAULT_DATABASE_FILE: &str = "estudos.db";

const SELECT_SUBJECT: &str = "SELECT id, name, folder, month, completed, instructor, created_at, completed_at FROM subjects";

/// SQLite backed subject store.
///
/// Holds only the database path: every operation opens its own connection,
/// enables foreign keys and runs inside one transaction.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StudyError::filesystem(parent, e))?;
                debug!("Created database directory: {:?}", parent);
            }
        }

        let store = Self { path };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Database file in the per-user data directory
    pub fn default_path() -> PathBuf {
        let base_dir = directories::ProjectDirs::from("com", "study-tracker", "study-tracker")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".study-tracker")
            });

        base_dir.join(DEFAULT_DATABASE_FILE)
    }

    /// Open the database in the per-user data directory
    pub fn default_location() -> Result<Self> {
        let path = Self::default_path();
        info!("No database configured, using {:?}", path);
        Self::open(path)
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| {
            StudyError::storage(e).with_context(format!("Failed to open {}", self.path.display()))
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StudyError::storage)?;
        Ok(conn)
    }

    fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA).map_err(StudyError::storage)?;
        debug!("Schema ready in {:?}", self.path);
        Ok(())
    }

    /// Run `work` inside one transaction on a fresh connection
    fn with_transaction<T>(&self, work: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(StudyError::storage)?;
        let value = work(&tx)?;
        tx.commit().map_err(StudyError::storage)?;
        Ok(value)
    }
}

/// Subject row as stored, before conversion
struct SubjectRow {
    id: i64,
    name: String,
    folder: String,
    month: String,
    completed: bool,
    instructor: Option<String>,
    created_at: String,
    completed_at: Option<String>,
}

impl SubjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            folder: row.get(2)?,
            month: row.get(3)?,
            completed: row.get(4)?,
            instructor: row.get(5)?,
            created_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }

    fn into_record(self, files: Vec<String>) -> Result<SubjectRecord> {
        let month = Month::parse(&self.month).ok_or_else(|| {
            StudyError::Storage(format!("subject {} has unknown month '{}'", self.id, self.month))
        })?;

        Ok(SubjectRecord {
            id: SubjectId(self.id),
            name: self.name,
            folder: self.folder,
            month,
            completed: self.completed,
            instructor: self.instructor,
            created_at: parse_timestamp(&self.created_at)?,
            completed_at: self.completed_at.as_deref().map(parse_timestamp).transpose()?,
            files,
        })
    }
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| StudyError::Storage(format!("invalid timestamp '{}': {}", value, e)))
}

fn load_files(conn: &Connection, id: i64) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT file_name FROM source_files WHERE subject_id = ?1 ORDER BY file_name, id")
        .map_err(StudyError::storage)?;
    let files = stmt
        .query_map(params![id], |row| row.get(0))
        .map_err(StudyError::storage)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .map_err(StudyError::storage)?;
    Ok(files)
}

fn insert_files(conn: &Connection, id: i64, files: &[String]) -> Result<()> {
    let mut stmt = conn
        .prepare("INSERT INTO source_files (subject_id, file_name) VALUES (?1, ?2)")
        .map_err(StudyError::storage)?;
    for file in files {
        stmt.execute(params![id, file]).map_err(StudyError::storage)?;
    }
    Ok(())
}

fn fetch(conn: &Connection, id: SubjectId) -> Result<Option<SubjectRecord>> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_SUBJECT),
            params![id.0],
            SubjectRow::from_row,
        )
        .optional()
        .map_err(StudyError::storage)?;

    match row {
        Some(row) => {
            let files = load_files(conn, row.id)?;
            Ok(Some(row.into_record(files)?))
        }
        None => Ok(None),
    }
}

/// WHERE clause and bound values for a filter
fn filter_clause(filter: &SubjectFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(completed) = filter.completed {
        clauses.push("completed = ?".to_string());
        values.push(Value::Integer(completed as i64));
    }

    if let Some(ref months) = filter.months {
        if months.is_empty() {
            clauses.push("0".to_string());
        } else {
            let placeholders = vec!["?"; months.len()].join(", ");
            clauses.push(format!("month IN ({})", placeholders));
            values.extend(
                months
                    .iter()
                    .map(|m| Value::Text(m.canonical().to_string())),
            );
        }
    }

    if let Some((start, end)) = filter.created_between {
        clauses.push("created_at BETWEEN ? AND ?".to_string());
        values.push(Value::Text(format_timestamp(&start)));
        values.push(Value::Text(format_timestamp(&end)));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

impl SubjectStore for SqliteStore {
    fn insert(&self, draft: &SubjectDraft) -> Result<SubjectRecord> {
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO subjects (name, folder, month, completed, instructor, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?5)",
                params![
                    draft.name,
                    draft.folder,
                    draft.month.canonical(),
                    draft.instructor,
                    format_timestamp(&draft.created_at),
                ],
            )
            .map_err(StudyError::storage)?;

            let id = tx.last_insert_rowid();
            insert_files(tx, id, &draft.files)?;

            info!("Stored subject {} with {} files", id, draft.files.len());
            fetch(tx, SubjectId(id))?
                .ok_or_else(|| StudyError::Storage(format!("subject {} vanished after insert", id)))
        })
    }

    fn list(&self, filter: &SubjectFilter) -> Result<Vec<SubjectRecord>> {
        let (clause, values) = filter_clause(filter);

        self.with_transaction(|tx| {
            let mut stmt = tx
                .prepare(&format!("{}{} ORDER BY id", SELECT_SUBJECT, clause))
                .map_err(StudyError::storage)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), SubjectRow::from_row)
                .map_err(StudyError::storage)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StudyError::storage)?;

            rows.into_iter()
                .map(|row| {
                    let files = load_files(tx, row.id)?;
                    row.into_record(files)
                })
                .collect()
        })
    }

    fn get(&self, id: SubjectId) -> Result<Option<SubjectRecord>> {
        self.with_transaction(|tx| fetch(tx, id))
    }

    fn set_completion(
        &self,
        id: SubjectId,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<Option<SubjectRecord>> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE subjects SET completed = ?1, completed_at = ?2 WHERE id = ?3",
                    params![
                        completed_at.is_some(),
                        completed_at.as_ref().map(format_timestamp),
                        id.0
                    ],
                )
                .map_err(StudyError::storage)?;

            if changed == 0 {
                return Ok(None);
            }
            fetch(tx, id)
        })
    }

    fn update(&self, id: SubjectId, changes: &SubjectChanges) -> Result<Option<SubjectRecord>> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE subjects SET name = ?1, folder = ?2, month = ?3, instructor = ?4 WHERE id = ?5",
                    params![
                        changes.name,
                        changes.folder,
                        changes.month.canonical(),
                        changes.instructor,
                        id.0
                    ],
                )
                .map_err(StudyError::storage)?;

            if changed == 0 {
                return Ok(None);
            }

            if let Some(ref files) = changes.files {
                tx.execute("DELETE FROM source_files WHERE subject_id = ?1", params![id.0])
                    .map_err(StudyError::storage)?;
                insert_files(tx, id.0, files)?;
                debug!("Replaced files of subject {} ({} now)", id, files.len());
            }

            fetch(tx, id)
        })
    }

    fn delete(&self, id: SubjectId) -> Result<bool> {
        self.with_transaction(|tx| {
            tx.execute("DELETE FROM source_files WHERE subject_id = ?1", params![id.0])
                .map_err(StudyError::storage)?;
            let deleted = tx
                .execute("DELETE FROM subjects WHERE id = ?1", params![id.0])
                .map_err(StudyError::storage)?;
            Ok(deleted > 0)
        })
    }

    fn delete_all(&self) -> Result<usize> {
        self.with_transaction(|tx| {
            tx.execute("DELETE FROM source_files", [])
                .map_err(StudyError::storage)?;
            let deleted = tx
                .execute("DELETE FROM subjects", [])
                .map_err(StudyError::storage)?;
            Ok(deleted)
        })
    }

    fn count(&self) -> Result<usize> {
        self.with_transaction(|tx| {
            let count: i64 = tx
                .query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))
                .map_err(StudyError::storage)?;
            Ok(count as usize)
        })
    }
}
