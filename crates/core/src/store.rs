//! JSON file persistence helpers.
//!
//! Writes go to a sibling temporary file which is then renamed over the target, so a crash
//! mid-write leaves the previous contents intact.

use crate::{AssessmentError, AssessmentResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads and parses a JSON file, returning `None` if it does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> AssessmentResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AssessmentError::FileRead(e)),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(AssessmentError::Deserialization)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> AssessmentResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(AssessmentError::StorageDirCreation)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(AssessmentError::Serialization)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(AssessmentError::FileWrite)?;
    fs::rename(&tmp, path).map_err(AssessmentError::FileWrite)?;

    tracing::debug!(path = %path.display(), "wrote data file");
    Ok(())
}

/// Removes a file; a file that is already gone is not an error.
pub(crate) fn remove_file(path: &Path) -> AssessmentResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssessmentError::FileRemove(e)),
    }
}
