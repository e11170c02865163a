//! Subject data models

use crate::types::{Month, SubjectId, TIMESTAMP_FORMAT};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Flattened subject as returned by the repository, files included.
///
/// This is the only shape that leaves the persistence layer: listings, the
/// CLI and every exporter work on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub name: String,
    pub folder: String,
    pub month: Month,
    pub completed: bool,
    pub instructor: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    /// Names of the attached source files, in file-name order
    pub files: Vec<String>,
}

impl SubjectRecord {
    /// Number of attached source files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether the completion flag and timestamp agree
    pub fn completion_consistent(&self) -> bool {
        self.completed == self.completed_at.is_some()
    }

    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn completed_at_display(&self) -> Option<String> {
        self.completed_at
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Raw user input for a new subject, validated before it reaches the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubject {
    pub name: String,
    pub folder: String,
    pub month: String,
    pub instructor: Option<String>,
}

impl NewSubject {
    pub fn new(name: impl Into<String>, folder: impl Into<String>, month: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            month: month.into(),
            instructor: None,
        }
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }
}

/// Validated subject ready to be written, source files already scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
    pub name: String,
    pub folder: String,
    pub month: Month,
    pub instructor: Option<String>,
    pub created_at: NaiveDateTime,
    pub files: Vec<String>,
}

/// Partial edit of an existing subject. `None` keeps the current value;
/// an empty instructor clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectEdit {
    pub name: Option<String>,
    pub folder: Option<String>,
    pub month: Option<String>,
    pub instructor: Option<String>,
}

impl SubjectEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.folder.is_none()
            && self.month.is_none()
            && self.instructor.is_none()
    }
}

/// Validated replacement values for an in-place update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectChanges {
    pub name: String,
    pub folder: String,
    pub month: Month,
    pub instructor: Option<String>,
    /// New source file list when the folder changed
    pub files: Option<Vec<String>>,
}

/// Listing criteria; every populated field must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    pub completed: Option<bool>,
    pub months: Option<Vec<Month>>,
    pub created_between: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl SubjectFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn completed(completed: Option<bool>) -> Self {
        Self {
            completed,
            ..Self::default()
        }
    }

    pub fn months(months: impl IntoIterator<Item = Month>) -> Self {
        Self {
            months: Some(months.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn created_between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            created_between: Some((start, end)),
            ..Self::default()
        }
    }

    /// Check if a record matches this filter
    pub fn matches(&self, record: &SubjectRecord) -> bool {
        if let Some(completed) = self.completed {
            if record.completed != completed {
                return false;
            }
        }

        if let Some(ref months) = self.months {
            if !months.contains(&record.month) {
                return false;
            }
        }

        if let Some((start, end)) = self.created_between {
            if record.created_at < start || record.created_at > end {
                return false;
            }
        }

        true
    }
}

/// Current local time truncated to whole seconds, the store's resolution
pub fn timestamp_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
pub(crate) fn sample_record(id: i64, name: &str, month: Month, completed: bool) -> SubjectRecord {
    use chrono::NaiveDate;

    let created_at = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap();
    SubjectRecord {
        id: SubjectId(id),
        name: name.to_string(),
        folder: format!("/study/{}", name.to_lowercase()),
        month,
        completed,
        instructor: None,
        created_at,
        completed_at: completed.then(|| created_at + chrono::Duration::days(30)),
        files: vec![],
    }
}
