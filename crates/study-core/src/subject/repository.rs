//! Subject repository: the only gateway to persisted subjects.
//!
//! Storage and filesystem failures are logged, reported through the
//! [`Feedback`] sink and turned into a safe default, so a broken database
//! never takes the interactive loop down with it. Validation failures are
//! returned to the caller untouched.

use super::model::{
    timestamp_now, NewSubject, SubjectChanges, SubjectDraft, SubjectEdit, SubjectFilter,
    SubjectRecord,
};
use super::store::SubjectStore;
use super::validator::validate;
use crate::error::{Result, StudyError};
use crate::library;
use crate::types::{MonthSelection, SubjectId};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Default document extension picked up by folder scans
pub const DEFAULT_DOCUMENT_EXTENSION: &str = ".pdf";

/// Sink for user-facing messages emitted by the repository
pub trait Feedback: Send + Sync {
    /// Report a failed operation
    fn error(&self, message: &str);

    /// Report a completed operation
    fn success(&self, _message: &str) {}
}

/// Feedback sink that drops every message
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn error(&self, _message: &str) {}
}

/// Repository over a [`SubjectStore`]
pub struct SubjectRepository {
    store: Arc<dyn SubjectStore>,
    feedback: Arc<dyn Feedback>,
    document_extension: String,
}

impl SubjectRepository {
    /// Create a repository that reports nothing
    pub fn new(store: impl SubjectStore + 'static) -> Self {
        Self::with_feedback(Arc::new(store), Arc::new(SilentFeedback))
    }

    /// Create a repository over a shared store with a feedback sink
    pub fn with_feedback(store: Arc<dyn SubjectStore>, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            store,
            feedback,
            document_extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
        }
    }

    /// Set the extension that marks a file as study material
    pub fn with_document_extension(mut self, extension: impl Into<String>) -> Self {
        self.document_extension = extension.into();
        self
    }

    /// Insert a subject and return how many documents were attached
    pub fn insert(&self, name: &str, folder: &str, month: &str) -> Result<usize> {
        self.insert_with(NewSubject::new(name, folder, month))
            .map(|record| record.file_count())
    }

    /// Insert a subject, optionally with instructor, and return the record
    pub fn insert_with(&self, subject: NewSubject) -> Result<SubjectRecord> {
        let month = validate(&subject).into_result()?;

        let folder = subject.folder.trim();
        let files = library::scan_documents(Path::new(folder), &self.document_extension)
            .map_err(|e| self.report("Failed to scan folder", e))?;

        let draft = SubjectDraft {
            name: subject.name.trim().to_string(),
            folder: folder.to_string(),
            month,
            instructor: clean_instructor(subject.instructor),
            created_at: timestamp_now(),
            files,
        };

        let record = self
            .store
            .insert(&draft)
            .map_err(|e| self.report(&format!("Failed to insert subject '{}'", draft.name), e))?;

        info!(
            "Inserted subject {} '{}' with {} documents",
            record.id,
            record.name,
            record.file_count()
        );
        Ok(record)
    }

    /// List all subjects, or only those with the given completion state
    pub fn list(&self, completed: Option<bool>) -> Vec<SubjectRecord> {
        self.search(&SubjectFilter::completed(completed))
    }

    /// List subjects that start in any of the selected months
    pub fn list_by_months(&self, selection: &MonthSelection) -> Vec<SubjectRecord> {
        self.search(&SubjectFilter::months(selection.months().iter().copied()))
    }

    /// List subjects created inside `[start, end]`
    pub fn list_created_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<SubjectRecord> {
        self.search(&SubjectFilter::created_between(start, end))
    }

    /// List subjects matching an arbitrary filter
    pub fn search(&self, filter: &SubjectFilter) -> Vec<SubjectRecord> {
        match self.store.list(filter) {
            Ok(records) => {
                debug!("Listed {} subjects", records.len());
                records
            }
            Err(e) => {
                self.report("Failed to list subjects", e);
                Vec::new()
            }
        }
    }

    /// Look a subject up by ID
    pub fn get(&self, id: SubjectId) -> Option<SubjectRecord> {
        self.store
            .get(id)
            .unwrap_or_else(|e| {
                self.report(&format!("Failed to load subject {}", id), e);
                None
            })
    }

    /// Set the completion flag. The time is stamped only when a subject
    /// becomes completed; re-marking keeps the original stamp and marking
    /// incomplete clears it. Unknown IDs are ignored.
    pub fn update_completion(&self, id: SubjectId, completed: bool) -> Option<SubjectRecord> {
        let current = match self.store.get(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("update_completion: subject {} does not exist", id);
                return None;
            }
            Err(e) => {
                self.report(&format!("Failed to update subject {}", id), e);
                return None;
            }
        };

        let completed_at = match (completed, current.completed) {
            (false, _) => None,
            (true, true) => current.completed_at.or_else(|| Some(timestamp_now())),
            (true, false) => Some(timestamp_now()),
        };
        match self.store.set_completion(id, completed_at) {
            Ok(Some(record)) => {
                info!("Subject {} completed={}", id, completed);
                let message = match record.completed_at_display() {
                    Some(at) => format!("Subject '{}' (ID {}) completed at {}", record.name, id, at),
                    None => format!("Subject '{}' (ID {}) marked as not completed", record.name, id),
                };
                self.feedback.success(&message);
                Some(record)
            }
            Ok(None) => {
                debug!("update_completion: subject {} does not exist", id);
                None
            }
            Err(e) => {
                self.report(&format!("Failed to update subject {}", id), e);
                None
            }
        }
    }

    /// Edit a subject in place, keeping its ID. A changed folder is rescanned
    /// and replaces the attached documents. Returns `Ok(None)` for unknown IDs.
    pub fn update(&self, id: SubjectId, edit: SubjectEdit) -> Result<Option<SubjectRecord>> {
        let current = match self.store.get(id) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(e) => return Err(self.report(&format!("Failed to load subject {}", id), e)),
        };

        let merged = NewSubject {
            name: edit.name.unwrap_or_else(|| current.name.clone()),
            folder: edit.folder.unwrap_or_else(|| current.folder.clone()),
            month: edit
                .month
                .unwrap_or_else(|| current.month.canonical().to_string()),
            instructor: match edit.instructor {
                Some(instructor) => clean_instructor(Some(instructor)),
                None => current.instructor.clone(),
            },
        };
        let month = validate(&merged).into_result()?;

        let folder = merged.folder.trim().to_string();
        let files = if folder != current.folder {
            let scanned = library::scan_documents(Path::new(&folder), &self.document_extension)
                .map_err(|e| self.report("Failed to scan folder", e))?;
            Some(scanned)
        } else {
            None
        };

        let changes = SubjectChanges {
            name: merged.name.trim().to_string(),
            folder,
            month,
            instructor: merged.instructor,
            files,
        };

        let updated = self
            .store
            .update(id, &changes)
            .map_err(|e| self.report(&format!("Failed to update subject {}", id), e))?;

        if let Some(ref record) = updated {
            info!("Edited subject {} '{}'", id, record.name);
        }
        Ok(updated)
    }

    /// Delete one subject and its documents
    pub fn delete(&self, id: SubjectId) -> bool {
        match self.store.delete(id) {
            Ok(deleted) => {
                if deleted {
                    info!("Deleted subject {}", id);
                }
                deleted
            }
            Err(e) => {
                self.report(&format!("Failed to delete subject {}", id), e);
                false
            }
        }
    }

    /// Delete every subject and document, returning how many subjects went
    pub fn delete_all(&self) -> usize {
        match self.store.delete_all() {
            Ok(count) => {
                info!("Deleted all {} subjects", count);
                count
            }
            Err(e) => {
                self.report("Failed to delete all subjects", e);
                0
            }
        }
    }

    /// Number of stored subjects
    pub fn count(&self) -> usize {
        self.store.count().unwrap_or_else(|e| {
            self.report("Failed to count subjects", e);
            0
        })
    }

    /// Log and surface a failure, handing the error back for propagation
    fn report(&self, context: &str, err: StudyError) -> StudyError {
        error!("{}: {}", context, err);
        self.feedback.error(&format!("{}: {}", context, err));
        err
    }
}

fn clean_instructor(instructor: Option<String>) -> Option<String> {
    instructor
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::store::memory::MemoryStore;
    use crate::subject::InvalidField;
    use crate::types::Month;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingFeedback {
        errors: Mutex<Vec<String>>,
        successes: Mutex<Vec<String>>,
    }

    impl Feedback for RecordingFeedback {
        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        fn success(&self, message: &str) {
            self.successes.lock().unwrap().push(message.to_string());
        }
    }

    struct Fixture {
        repo: SubjectRepository,
        store: Arc<MemoryStore>,
        feedback: Arc<RecordingFeedback>,
        folder: TempDir,
    }

    fn fixture(pdfs: &[&str]) -> Fixture {
        let folder = TempDir::new().unwrap();
        for name in pdfs {
            fs::write(folder.path().join(name), b"%PDF").unwrap();
        }
        fs::write(folder.path().join("readme.txt"), b"ignored").unwrap();

        let store = Arc::new(MemoryStore::new());
        let feedback = Arc::new(RecordingFeedback::default());
        let repo = SubjectRepository::with_feedback(store.clone(), feedback.clone());
        Fixture {
            repo,
            store,
            feedback,
            folder,
        }
    }

    fn folder_str(f: &Fixture) -> String {
        f.folder.path().to_string_lossy().to_string()
    }

    #[test]
    fn test_insert_attaches_matching_documents() {
        let f = fixture(&["a.pdf", "b.PDF", "c.pdf"]);
        let count = f.repo.insert("Cálculo", &folder_str(&f), "janeiro").unwrap();
        assert_eq!(count, 3);

        let listed = f.repo.list(None);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_count(), 3);
        assert_eq!(listed[0].month, Month::January);
        assert!(!listed[0].completed);
        assert!(listed[0].completed_at.is_none());
    }

    #[test]
    fn test_insert_rejects_blank_fields() {
        let f = fixture(&["a.pdf"]);
        let folder = folder_str(&f);

        for (name, dir, month, field) in [
            ("", folder.as_str(), "janeiro", InvalidField::Name),
            ("Física", "", "janeiro", InvalidField::Folder),
            ("Física", folder.as_str(), "", InvalidField::Month),
        ] {
            match f.repo.insert(name, dir, month) {
                Err(StudyError::Validation(got)) => assert_eq!(got, field),
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        assert!(f.repo.list(None).is_empty());
        assert!(f.feedback.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_insert_missing_folder_creates_nothing() {
        let f = fixture(&[]);
        let missing = f.folder.path().join("gone").to_string_lossy().to_string();
        let err = f.repo.insert("Física", &missing, "maio").unwrap_err();
        assert!(matches!(err, StudyError::Filesystem { .. }));
        assert_eq!(f.repo.count(), 0);
        assert_eq!(f.feedback.errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_update_completion_toggles_timestamp() {
        let f = fixture(&["a.pdf"]);
        f.repo.insert("Química", &folder_str(&f), "abril").unwrap();
        let id = f.repo.list(None)[0].id;

        let done = f.repo.update_completion(id, true).unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let undone = f.repo.update_completion(id, false).unwrap();
        assert!(!undone.completed);
        assert!(undone.completed_at.is_none());

        for record in f.repo.list(None) {
            assert!(record.completion_consistent());
        }
        assert_eq!(f.feedback.successes.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_update_completion_keeps_first_stamp() {
        let f = fixture(&["a.pdf"]);
        f.repo.insert("Química", &folder_str(&f), "abril").unwrap();
        let id = f.repo.list(None)[0].id;

        let first = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        f.store.set_completion(id, Some(first)).unwrap();

        let again = f.repo.update_completion(id, true).unwrap();
        assert!(again.completed);
        assert_eq!(again.completed_at, Some(first));
        assert_eq!(f.repo.get(id).unwrap().completed_at, Some(first));

        let undone = f.repo.update_completion(id, false).unwrap();
        assert!(undone.completed_at.is_none());
        let redone = f.repo.update_completion(id, true).unwrap();
        assert_ne!(redone.completed_at, Some(first));
    }

    #[test]
    fn test_update_completion_unknown_id_is_noop() {
        let f = fixture(&[]);
        assert!(f.repo.update_completion(SubjectId(99), true).is_none());
        assert!(f.feedback.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_filter_completed_returns_marked_subject() {
        let f = fixture(&["a.pdf"]);
        let folder = folder_str(&f);
        for name in ["A", "B", "C"] {
            f.repo.insert(name, &folder, "junho").unwrap();
        }
        let target = f.repo.list(None)[1].id;
        f.repo.update_completion(target, true);

        let done = f.repo.list(Some(true));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, target);
        assert_eq!(f.repo.list(Some(false)).len(), 2);
    }

    #[test]
    fn test_delete_and_delete_all() {
        let f = fixture(&["a.pdf"]);
        let folder = folder_str(&f);
        f.repo.insert("A", &folder, "julho").unwrap();
        f.repo.insert("B", &folder, "agosto").unwrap();
        let id = f.repo.list(None)[0].id;

        assert!(f.repo.delete(id));
        assert!(f.repo.get(id).is_none());
        assert!(!f.repo.delete(id));

        assert_eq!(f.repo.delete_all(), 1);
        assert!(f.repo.list(None).is_empty());
        assert_eq!(f.repo.delete_all(), 0);
    }

    #[test]
    fn test_list_by_months() {
        let f = fixture(&[]);
        let folder = folder_str(&f);
        f.repo.insert("A", &folder, "janeiro").unwrap();
        f.repo.insert("B", &folder, "abril").unwrap();
        f.repo.insert("C", &folder, "dezembro").unwrap();

        let selection = MonthSelection::parse("março-junho").unwrap();
        let found = f.repo.list_by_months(&selection);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "B");
    }

    #[test]
    fn test_update_in_place_keeps_id_and_rescans() {
        let f = fixture(&["a.pdf"]);
        f.repo.insert("Redes", &folder_str(&f), "março").unwrap();
        let id = f.repo.list(None)[0].id;

        let other = TempDir::new().unwrap();
        fs::write(other.path().join("x.pdf"), b"%PDF").unwrap();
        fs::write(other.path().join("y.pdf"), b"%PDF").unwrap();

        let edit = SubjectEdit {
            name: Some("Redes II".into()),
            folder: Some(other.path().to_string_lossy().to_string()),
            instructor: Some("Prof. Lima".into()),
            ..Default::default()
        };
        let updated = f.repo.update(id, edit).unwrap().unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Redes II");
        assert_eq!(updated.month, Month::March);
        assert_eq!(updated.instructor.as_deref(), Some("Prof. Lima"));
        assert_eq!(updated.files, vec!["x.pdf".to_string(), "y.pdf".to_string()]);
        assert_eq!(f.repo.count(), 1);
    }

    #[test]
    fn test_update_validates_merged_subject() {
        let f = fixture(&[]);
        f.repo.insert("Redes", &folder_str(&f), "março").unwrap();
        let id = f.repo.list(None)[0].id;

        let edit = SubjectEdit {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(f.repo.update(id, edit).unwrap_err().is_validation());
        assert!(f.repo.update(SubjectId(404), SubjectEdit::default()).unwrap().is_none());
    }

    #[test]
    fn test_storage_failure_returns_safe_defaults() {
        let f = fixture(&["a.pdf"]);
        f.repo.insert("A", &folder_str(&f), "maio").unwrap();
        f.store.set_failing(true);

        assert!(f.repo.list(None).is_empty());
        assert!(f.repo.get(SubjectId(1)).is_none());
        assert!(f.repo.update_completion(SubjectId(1), true).is_none());
        assert!(!f.repo.delete(SubjectId(1)));
        assert_eq!(f.repo.delete_all(), 0);
        assert!(matches!(
            f.repo.insert("B", &folder_str(&f), "maio"),
            Err(StudyError::Storage(_))
        ));

        assert_eq!(f.feedback.errors.lock().unwrap().len(), 6);
    }
}
