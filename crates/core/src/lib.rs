//! # Conan Core
//!
//! Screening risk engine for the Conan lung-cancer awareness tool.
//!
//! The engine is three pure functions:
//! - [`score_symptoms`]: weighted-sum scoring of the thirteen-item symptom checklist
//! - [`score_imaging`]: deterministic placeholder scoring of an image identifier
//! - [`combine`]: equal-weight fusion of one symptoms result and one imaging result
//!
//! Around it sit the pieces a caller needs to keep state between assessments: per-user result
//! history, settings and the [`AppContext`] that persists them as JSON under a configured data
//! directory.
//!
//! **No presentation concerns**: rendering, prompts and the processing delay shown before
//! imaging results belong to the caller.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod fusion;
pub mod history;
pub mod imaging;
pub mod settings;
mod store;
pub mod symptoms;
pub mod user;
pub mod validation;
pub mod weights;

pub use config::CoreConfig;
pub use context::AppContext;
pub use error::{AssessmentError, AssessmentResult};
pub use fusion::{assess_combined, combine};
pub use history::{DashboardSummary, ResultHistory, TrendPoint};
pub use imaging::{score_imaging, ImageReference};
pub use settings::{FontSize, Settings, SettingsUpdate};
pub use symptoms::{score_symptom_answers, score_symptoms, SymptomVector};
pub use user::User;
pub use weights::{SymptomKey, WeightEntry};

pub use conan_types::{
    EmailAddress, Factor, ImpactTier, NonEmptyText, PredictionResult, RiskLevel, SourceType,
    TextError,
};
