//! study-core - Core library for study-tracker
//!
//! This crate provides the domain logic of the study tracker: subjects and
//! their source documents, validation, the repository facade over a
//! pluggable store, library organisation, configuration and the
//! multi-format export engine.

pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod library;
pub mod subject;
pub mod types;

pub use error::{Result, StudyError};
pub use types::*;
