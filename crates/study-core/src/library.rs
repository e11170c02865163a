//! Study material on disk: folder scans, file-name normalisation and the
//! optional organised library tree (`<root>/<month>/<subject>/`).

use crate::error::{Result, StudyError};
use crate::types::Month;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that cannot appear in file names on common filesystems
const INVALID_FILE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// List the regular files directly inside `folder` whose name ends with
/// `extension` (case-insensitive), sorted by name.
pub fn scan_documents(folder: &Path, extension: &str) -> Result<Vec<String>> {
    let suffix = extension.to_lowercase();
    let entries = fs::read_dir(folder).map_err(|e| StudyError::filesystem(folder, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StudyError::filesystem(folder, e))?;
        // Follows symlinks; a dangling link is not a document
        let is_file = match fs::metadata(entry.path()) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(StudyError::filesystem(entry.path(), e)),
        };
        if !is_file {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().ends_with(&suffix) {
            names.push(name);
        }
    }

    names.sort();
    debug!("Found {} documents in {:?}", names.len(), folder);
    Ok(names)
}

/// Replace characters that are invalid in file names with `_` and trim.
/// Names made only of dots (`.`, `..`) would address the parent tree, so
/// their dots become `_` as well; an empty result becomes `_`.
pub fn normalize_file_name(name: &str) -> String {
    let cleaned = name
        .chars()
        .map(|c| if INVALID_FILE_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.chars().count().max(1))
    } else {
        cleaned
    }
}

/// Directory a subject's material is copied to inside the library
pub fn library_path(root: &Path, month: Month, subject_name: &str) -> PathBuf {
    root.join(month.canonical())
        .join(normalize_file_name(subject_name))
}

/// Copy the given documents from `source` into the subject's library
/// directory, creating it as needed. Returns the directory and the number of
/// files copied.
pub fn organize(
    root: &Path,
    month: Month,
    subject_name: &str,
    source: &Path,
    files: &[String],
) -> Result<(PathBuf, usize)> {
    let target = library_path(root, month, subject_name);
    fs::create_dir_all(&target).map_err(|e| StudyError::filesystem(&target, e))?;

    let mut copied = 0;
    for file in files {
        let from = source.join(file);
        let to = target.join(file);
        fs::copy(&from, &to).map_err(|e| StudyError::filesystem(&from, e))?;
        copied += 1;
    }

    debug!("Copied {} files into {:?}", copied, target);
    Ok((target, copied))
}
