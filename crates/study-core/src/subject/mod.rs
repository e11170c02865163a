//! Subject tracking module
//!
//! A subject (matéria) is a course or topic tied to a folder of study
//! material, a start month and a completion state. This module holds the
//! data model, the validation rules, the store seam and the repository that
//! callers go through.
//!
//! # Example
//!
//! ```ignore
//! use study_core::subject::SubjectRepository;
//! use study_storage::SqliteStore;
//!
//! let repo = SubjectRepository::new(SqliteStore::open("estudos.db")?);
//! let attached = repo.insert("Cálculo I", "/home/ana/calculo", "março")?;
//! let pending = repo.list(Some(false));
//! ```

mod model;
mod repository;
mod store;
mod validator;

pub use model::{
    timestamp_now, NewSubject, SubjectChanges, SubjectDraft, SubjectEdit, SubjectFilter,
    SubjectRecord,
};
pub use repository::{Feedback, SilentFeedback, SubjectRepository, DEFAULT_DOCUMENT_EXTENSION};
pub use store::SubjectStore;
pub use validator::{validate, InvalidField, Validation};

#[cfg(test)]
pub(crate) use model::sample_record;
#[cfg(test)]
pub use store::memory::MemoryStore;
