//! Constants used throughout the Conan core crate.
//!
//! Scoring thresholds and confidence bands live here next to the storage filenames so the
//! numbers that define the engine's behaviour can be read in one place.

/// Default directory for persisted user and settings files.
pub const DEFAULT_DATA_DIR: &str = "conan_data";

/// Filename for the signed-in user and their result history.
pub const USER_JSON_FILENAME: &str = "conan_user.json";

/// Filename for application settings.
pub const SETTINGS_JSON_FILENAME: &str = "conan_settings.json";

/// Filename for the most recent result, kept whether or not a user is signed in.
pub const LAST_RESULT_JSON_FILENAME: &str = "conan_last_result.json";

/// Maximum number of results kept per user, newest first.
pub const HISTORY_CAPACITY: usize = 20;

/// Number of most recent results shown in the dashboard trend.
pub const TREND_WINDOW: usize = 10;

/// Weight at or above which a symptom is a high-impact factor.
pub const HIGH_IMPACT_WEIGHT: f64 = 2.5;

/// Weight at or above which a symptom is a medium-impact factor.
pub const MEDIUM_IMPACT_WEIGHT: f64 = 1.5;

/// Normalized symptom score below which risk is low.
pub const SYMPTOM_LOW_BELOW: f64 = 0.25;

/// Normalized symptom score below which risk is moderate.
pub const SYMPTOM_MODERATE_BELOW: f64 = 0.55;

/// Upper bound on symptom confidence.
pub const SYMPTOM_CONFIDENCE_CAP: u8 = 97;

/// Normalized image value below which risk is low.
pub const IMAGING_LOW_BELOW: f64 = 0.33;

/// Normalized image value below which risk is moderate.
pub const IMAGING_MODERATE_BELOW: f64 = 0.66;

/// Normalized image value above which hilar prominence is reported.
pub const HILAR_PROMINENCE_ABOVE: f64 = 0.4;

/// Fixed imaging confidence for low, moderate and high risk.
pub const IMAGING_CONFIDENCE: [u8; 3] = [82, 74, 79];

/// Weight given to each modality when fusing.
pub const FUSION_WEIGHT: f64 = 0.5;

/// Combined score below which fused risk is low.
pub const COMBINED_LOW_BELOW: f64 = 0.5;

/// Combined score below which fused risk is moderate.
pub const COMBINED_MODERATE_BELOW: f64 = 1.25;

/// Maximum number of present factors carried into a combined result.
pub const COMBINED_FACTOR_LIMIT: usize = 8;
