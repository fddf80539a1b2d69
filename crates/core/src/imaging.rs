//! Chest X-ray scoring placeholder.
//!
//! No pixels are analysed. An image is represented by an opaque identifier string (the file name
//! followed by its byte size) and the identifier is folded into a pseudo-random value in `[0, 1)`.
//! The same identifier always produces the same result.

use crate::constants::{
    HILAR_PROMINENCE_ABOVE, IMAGING_CONFIDENCE, IMAGING_LOW_BELOW, IMAGING_MODERATE_BELOW,
};
use crate::{AssessmentError, AssessmentResult};
use chrono::Utc;
use conan_types::{Factor, ImpactTier, PredictionResult, RiskLevel, SourceType};
use std::fmt;
use std::path::Path;

const LOW_SUMMARY: &str = "Chest X-ray analysis indicates no significant abnormalities detected. Lung fields appear clear. Routine follow-up is recommended.";
const MODERATE_SUMMARY: &str = "Chest X-ray analysis shows some areas of interest that warrant further clinical evaluation. A follow-up CT scan or specialist consultation is advised.";
const HIGH_SUMMARY: &str = "Chest X-ray analysis has identified potential areas of concern. Immediate consultation with a pulmonologist or oncologist is strongly recommended.";

/// Identifier for an uploaded image, built from its file name and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    file_name: String,
    size_bytes: u64,
}

impl ImageReference {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
        }
    }

    /// Builds a reference for an image file on disk.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::InvalidInput` if the path is not a regular file or its content is
    /// not recognised as an image, and `AssessmentError::FileRead` if it cannot be inspected.
    pub fn from_path(path: &Path) -> AssessmentResult<Self> {
        let metadata = std::fs::metadata(path).map_err(AssessmentError::FileRead)?;
        if !metadata.is_file() {
            return Err(AssessmentError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let kind = infer::get_from_path(path).map_err(AssessmentError::FileRead)?;
        match kind {
            Some(kind) if kind.mime_type().starts_with("image/") => {
                tracing::debug!(path = %path.display(), mime = kind.mime_type(), "accepted image");
            }
            Some(kind) => {
                return Err(AssessmentError::InvalidInput(format!(
                    "{} is {}, not an image",
                    path.display(),
                    kind.mime_type()
                )))
            }
            None => {
                return Err(AssessmentError::InvalidInput(format!(
                    "{} is not a recognised image format",
                    path.display()
                )))
            }
        }

        let file_name = path
            .file_name()
            .and_then(|os| os.to_str())
            .ok_or_else(|| {
                AssessmentError::InvalidInput(format!(
                    "{} has no UTF-8 file name",
                    path.display()
                ))
            })?
            .to_string();

        Ok(Self::new(file_name, metadata.len()))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// The identifier string fed to [`score_imaging`].
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_name, self.size_bytes)
    }
}

/// Folds an identifier into `[0, 1)`: the sum of its UTF-16 code units, modulo 100, over 100.
pub fn normalized_image_value(identifier: &str) -> f64 {
    let hash: u64 = identifier.encode_utf16().map(u64::from).sum();
    (hash % 100) as f64 / 100.0
}

pub fn imaging_risk_level(normalized: f64) -> RiskLevel {
    if normalized < IMAGING_LOW_BELOW {
        RiskLevel::Low
    } else if normalized < IMAGING_MODERATE_BELOW {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

fn structural_factors(level: RiskLevel, normalized: f64) -> Vec<Factor> {
    vec![
        Factor::new("Lung Field Clarity", ImpactTier::High, level != RiskLevel::Low),
        Factor::new("Nodule Detection", ImpactTier::High, level == RiskLevel::High),
        Factor::new(
            "Pleural Effusion Indicators",
            ImpactTier::Medium,
            level == RiskLevel::High,
        ),
        Factor::new("Mediastinal Widening", ImpactTier::Medium, level != RiskLevel::Low),
        Factor::new(
            "Hilar Prominence",
            ImpactTier::Low,
            normalized > HILAR_PROMINENCE_ABOVE,
        ),
    ]
}

fn summary_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => LOW_SUMMARY,
        RiskLevel::Moderate => MODERATE_SUMMARY,
        RiskLevel::High => HIGH_SUMMARY,
    }
}

/// Scores an image identifier.
///
/// No image content is examined; the result depends only on the identifier, so the same
/// identifier always yields the same level, confidence and factors.
///
/// # Arguments
///
/// * `identifier` - Any string, including the empty string. Normally
///   [`ImageReference::identifier`].
///
/// # Returns
///
/// A `PredictionResult` of type `imaging` with five structural factors and a confidence of 82
/// (low), 74 (moderate) or 79 (high).
pub fn score_imaging(identifier: &str) -> PredictionResult {
    let normalized = normalized_image_value(identifier);
    let risk_level = imaging_risk_level(normalized);
    let confidence = IMAGING_CONFIDENCE[usize::from(risk_level.ordinal())];

    tracing::debug!(normalized, risk = %risk_level, confidence, "scored image identifier");

    PredictionResult {
        risk_level,
        confidence,
        factors: structural_factors(risk_level, normalized),
        summary: summary_for(risk_level).to_string(),
        timestamp: Utc::now(),
        source_type: SourceType::Imaging,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Minimal PNG signature plus IHDR chunk header; enough for content sniffing.
    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    fn presence(result: &PredictionResult) -> Vec<bool> {
        result.factors.iter().map(|f| f.present).collect()
    }

    #[test]
    fn test_empty_identifier_is_low() {
        let result = score_imaging("");
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.confidence, 82);
        assert_eq!(result.source_type, SourceType::Imaging);
        assert_eq!(presence(&result), vec![false; 5]);
        assert_eq!(result.summary, LOW_SUMMARY);
    }

    #[test]
    fn test_hash_is_sum_of_code_units() {
        // 'A' = 65, 'B' = 66 -> 131 % 100 = 31
        assert_eq!(normalized_image_value("AB"), 0.31);
        // 'é' is a single UTF-16 unit (233); 233 % 100 = 33
        assert_eq!(normalized_image_value("é"), 0.33);
    }

    #[test]
    fn test_moderate_identifier() {
        // '-' = 45 -> 0.45: moderate, hilar prominence above 0.4
        let result = score_imaging("-");
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.confidence, 74);
        assert_eq!(presence(&result), vec![true, false, false, true, true]);
    }

    #[test]
    fn test_moderate_identifier_without_hilar_prominence() {
        // '#' = 35 -> 0.35: moderate, hilar prominence not above 0.4
        let result = score_imaging("#");
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(presence(&result), vec![true, false, false, true, false]);
    }

    #[test]
    fn test_high_identifier() {
        // 'Z' = 90 -> 0.9
        let result = score_imaging("Z");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.confidence, 79);
        assert_eq!(presence(&result), vec![true; 5]);
        assert_eq!(result.summary, HIGH_SUMMARY);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(imaging_risk_level(0.32), RiskLevel::Low);
        assert_eq!(imaging_risk_level(0.33), RiskLevel::Moderate);
        assert_eq!(imaging_risk_level(0.65), RiskLevel::Moderate);
        assert_eq!(imaging_risk_level(0.66), RiskLevel::High);
    }

    #[test]
    fn test_factor_list_is_fixed() {
        for identifier in ["", "scan.png2048", "Z", "chest-xray.jpeg998877"] {
            let result = score_imaging(identifier);
            let names: Vec<&str> = result.factors.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(
                names,
                vec![
                    "Lung Field Clarity",
                    "Nodule Detection",
                    "Pleural Effusion Indicators",
                    "Mediastinal Widening",
                    "Hilar Prominence",
                ]
            );
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let first = score_imaging("scan.png2048");
        let second = score_imaging("scan.png2048");
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.factors, second.factors);
    }

    #[test]
    fn test_image_reference_identifier_concatenates_name_and_size() {
        let reference = ImageReference::new("scan.png", 2048);
        assert_eq!(reference.identifier(), "scan.png2048");
    }

    #[test]
    fn test_image_reference_from_path_accepts_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("chest.png");
        fs::write(&path, PNG_BYTES).unwrap();

        let reference = ImageReference::from_path(&path).unwrap();
        assert_eq!(reference.file_name(), "chest.png");
        assert_eq!(reference.size_bytes(), PNG_BYTES.len() as u64);
        assert_eq!(reference.identifier(), format!("chest.png{}", PNG_BYTES.len()));
    }

    #[test]
    fn test_image_reference_from_path_rejects_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "not an x-ray").unwrap();

        let err = ImageReference::from_path(&path).expect_err("text is not an image");
        assert!(matches!(err, AssessmentError::InvalidInput(_)));
    }

    #[test]
    fn test_image_reference_from_path_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let err = ImageReference::from_path(temp.path()).expect_err("directory is not a file");
        assert!(matches!(err, AssessmentError::InvalidInput(msg) if msg.contains("not a file")));
    }

    #[test]
    fn test_image_reference_from_path_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ImageReference::from_path(&temp.path().join("gone.png"))
            .expect_err("missing file");
        assert!(matches!(err, AssessmentError::FileRead(_)));
    }
}
