//! Subject validation
//!
//! Every mutating repository operation goes through [`validate`] first.

use super::model::NewSubject;
use crate::types::Month;
use std::fmt;

/// Which field made a subject invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidField {
    Name,
    Folder,
    Month,
    UnknownMonth(String),
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidField::Name => f.write_str("subject name cannot be empty"),
            InvalidField::Folder => f.write_str("folder path cannot be empty"),
            InvalidField::Month => f.write_str("start month cannot be empty"),
            InvalidField::UnknownMonth(m) => write!(f, "unknown start month '{}'", m),
        }
    }
}

/// Outcome of validating a subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(Month),
    Invalid(InvalidField),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Convert into a result, carrying the parsed month on success
    pub fn into_result(self) -> crate::error::Result<Month> {
        match self {
            Validation::Valid(month) => Ok(month),
            Validation::Invalid(field) => Err(crate::error::StudyError::Validation(field)),
        }
    }
}

/// Validate name, folder and month, in that order
pub fn validate(subject: &NewSubject) -> Validation {
    if subject.name.trim().is_empty() {
        return Validation::Invalid(InvalidField::Name);
    }

    if subject.folder.trim().is_empty() {
        return Validation::Invalid(InvalidField::Folder);
    }

    let month = subject.month.trim();
    if month.is_empty() {
        return Validation::Invalid(InvalidField::Month);
    }

    match Month::parse(month) {
        Some(m) => Validation::Valid(m),
        None => Validation::Invalid(InvalidField::UnknownMonth(month.to_string())),
    }
}
