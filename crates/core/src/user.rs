//! Signed-in user record.

use crate::history::ResultHistory;
use crate::AssessmentResult;
use conan_types::{EmailAddress, NonEmptyText, PredictionResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Simple (unhyphenated) UUID assigned at sign-in.
    pub id: String,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    #[serde(default)]
    pub results: ResultHistory,
}

impl User {
    /// Creates a user with a fresh identifier and an empty history.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Text` if the name is blank or the email is malformed.
    pub fn sign_in(name: &str, email: &str) -> AssessmentResult<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: NonEmptyText::new(name)?,
            email: EmailAddress::parse(email)?,
            results: ResultHistory::new(),
        })
    }

    pub fn record(&mut self, result: PredictionResult) {
        self.results.push(result);
    }
}
