//! Subject store trait and abstractions

use super::model::{SubjectChanges, SubjectDraft, SubjectFilter, SubjectRecord};
use crate::error::Result;
use crate::types::SubjectId;
use chrono::NaiveDateTime;

/// Trait for subject store implementations.
///
/// Each call is one unit of work: acquire, perform, commit or roll back,
/// release. Source files live and die with their subject.
pub trait SubjectStore: Send + Sync {
    /// Insert a subject together with its source files
    fn insert(&self, draft: &SubjectDraft) -> Result<SubjectRecord>;

    /// List subjects matching the filter, in creation order
    fn list(&self, filter: &SubjectFilter) -> Result<Vec<SubjectRecord>>;

    /// Load a subject by ID
    fn get(&self, id: SubjectId) -> Result<Option<SubjectRecord>>;

    /// Set or clear the completion timestamp; the flag follows it
    fn set_completion(
        &self,
        id: SubjectId,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<Option<SubjectRecord>>;

    /// Replace the editable fields of a subject in place
    fn update(&self, id: SubjectId, changes: &SubjectChanges) -> Result<Option<SubjectRecord>>;

    /// Delete a subject and its source files
    fn delete(&self, id: SubjectId) -> Result<bool>;

    /// Delete every subject and source file, returning the subject count
    fn delete_all(&self) -> Result<usize>;

    /// Count stored subjects
    fn count(&self) -> Result<usize> {
        Ok(self.list(&SubjectFilter::all())?.len())
    }
}

/// In-memory store for testing
#[cfg(test)]
pub mod memory {
    use super::*;
    use crate::error::StudyError;
    use std::collections::BTreeMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct State {
        next_id: i64,
        subjects: BTreeMap<SubjectId, SubjectRecord>,
        fail: bool,
    }

    /// In-memory subject store for testing
    #[derive(Default)]
    pub struct MemoryStore {
        state: RwLock<State>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every following call fail with a storage error
        pub fn set_failing(&self, fail: bool) {
            self.state.write().unwrap().fail = fail;
        }

        fn check(&self) -> Result<()> {
            if self.state.read().unwrap().fail {
                return Err(StudyError::Storage("connection refused".to_string()));
            }
            Ok(())
        }
    }

    impl SubjectStore for MemoryStore {
        fn insert(&self, draft: &SubjectDraft) -> Result<SubjectRecord> {
            self.check()?;
            let mut state = self.state.write().unwrap();
            state.next_id += 1;
            let record = SubjectRecord {
                id: SubjectId(state.next_id),
                name: draft.name.clone(),
                folder: draft.folder.clone(),
                month: draft.month,
                completed: false,
                instructor: draft.instructor.clone(),
                created_at: draft.created_at,
                completed_at: None,
                files: draft.files.clone(),
            };
            state.subjects.insert(record.id, record.clone());
            Ok(record)
        }

        fn list(&self, filter: &SubjectFilter) -> Result<Vec<SubjectRecord>> {
            self.check()?;
            let state = self.state.read().unwrap();
            Ok(state
                .subjects
                .values()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect())
        }

        fn get(&self, id: SubjectId) -> Result<Option<SubjectRecord>> {
            self.check()?;
            Ok(self.state.read().unwrap().subjects.get(&id).cloned())
        }

        fn set_completion(
            &self,
            id: SubjectId,
            completed_at: Option<NaiveDateTime>,
        ) -> Result<Option<SubjectRecord>> {
            self.check()?;
            let mut state = self.state.write().unwrap();
            Ok(state.subjects.get_mut(&id).map(|record| {
                record.completed = completed_at.is_some();
                record.completed_at = completed_at;
                record.clone()
            }))
        }

        fn update(&self, id: SubjectId, changes: &SubjectChanges) -> Result<Option<SubjectRecord>> {
            self.check()?;
            let mut state = self.state.write().unwrap();
            Ok(state.subjects.get_mut(&id).map(|record| {
                record.name = changes.name.clone();
                record.folder = changes.folder.clone();
                record.month = changes.month;
                record.instructor = changes.instructor.clone();
                if let Some(ref files) = changes.files {
                    record.files = files.clone();
                }
                record.clone()
            }))
        }

        fn delete(&self, id: SubjectId) -> Result<bool> {
            self.check()?;
            Ok(self.state.write().unwrap().subjects.remove(&id).is_some())
        }

        fn delete_all(&self) -> Result<usize> {
            self.check()?;
            let mut state = self.state.write().unwrap();
            let count = state.subjects.len();
            state.subjects.clear();
            Ok(count)
        }
    }
}
