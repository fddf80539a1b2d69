//! Input validation utilities.
//!
//! Untyped symptom answers arrive as JSON objects from callers. They are checked here before
//! anything is scored so that an incomplete checklist is reported instead of defaulted.

use crate::weights::SymptomKey;
use crate::{AssessmentError, AssessmentResult};
use serde_json::{Map, Value};

/// Validates that a symptom answer map is complete and well formed.
///
/// The map must contain every symptom key exactly once, each with a boolean value, and no
/// other keys.
///
/// # Errors
///
/// Returns `AssessmentError::InvalidInput` naming every missing, unknown or non-boolean key.
pub fn validate_symptom_answers(answers: &Map<String, Value>) -> AssessmentResult<()> {
    let missing: Vec<&str> = SymptomKey::ALL
        .iter()
        .map(|k| k.as_str())
        .filter(|k| !answers.contains_key(*k))
        .collect();

    let unknown: Vec<&str> = answers
        .keys()
        .map(String::as_str)
        .filter(|k| k.parse::<SymptomKey>().is_err())
        .collect();

    let non_boolean: Vec<&str> = answers
        .iter()
        .filter(|(k, v)| k.parse::<SymptomKey>().is_ok() && !v.is_boolean())
        .map(|(k, _)| k.as_str())
        .collect();

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing symptom keys: {}", missing.join(", ")));
    }
    if !unknown.is_empty() {
        problems.push(format!("unknown symptom keys: {}", unknown.join(", ")));
    }
    if !non_boolean.is_empty() {
        problems.push(format!("non-boolean answers: {}", non_boolean.join(", ")));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AssessmentError::InvalidInput(problems.join("; ")))
    }
}
