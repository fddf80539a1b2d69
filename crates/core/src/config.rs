//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! [`AppContext`](crate::context::AppContext). Nothing in this crate reads environment variables while
//! handling a request.

use crate::constants::{
    DEFAULT_DATA_DIR, LAST_RESULT_JSON_FILENAME, SETTINGS_JSON_FILENAME, USER_JSON_FILENAME,
};
use crate::{AssessmentError, AssessmentResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The data directory need not exist yet; it is created on first write.
    pub fn new(data_dir: PathBuf) -> AssessmentResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(AssessmentError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        if data_dir.is_file() {
            return Err(AssessmentError::InvalidInput(format!(
                "data_dir {} is a file, not a directory",
                data_dir.display()
            )));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn user_file(&self) -> PathBuf {
        self.data_dir.join(USER_JSON_FILENAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_JSON_FILENAME)
    }

    pub fn last_result_file(&self) -> PathBuf {
        self.data_dir.join(LAST_RESULT_JSON_FILENAME)
    }
}

/// Resolve the data directory from an optional override value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
