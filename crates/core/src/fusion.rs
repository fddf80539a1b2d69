//! Fusion of a symptom assessment and an imaging assessment.
//!
//! The two risk levels are averaged on their ordinal scale with equal weight. The combined
//! thresholds are asymmetric: a score of exactly 0.5 (one modality moderate, the
//! other low) is already moderate, while high requires at least 1.25.

use crate::constants::{
    COMBINED_FACTOR_LIMIT, COMBINED_LOW_BELOW, COMBINED_MODERATE_BELOW, FUSION_WEIGHT,
};
use crate::imaging::score_imaging;
use crate::symptoms::{score_symptoms, SymptomVector};
use crate::{AssessmentError, AssessmentResult};
use chrono::Utc;
use conan_types::{Factor, PredictionResult, RiskLevel, SourceType};

const LOW_SUMMARY: &str = "Combined symptom and imaging analysis indicates low risk. No significant concerns identified. Maintain healthy habits and schedule regular screenings.";
const MODERATE_SUMMARY: &str = "Combined analysis of symptoms and chest X-ray reveals moderate risk indicators. A comprehensive clinical evaluation by a healthcare professional is recommended.";
const HIGH_SUMMARY: &str = "Both symptom profile and imaging analysis indicate elevated risk factors. Urgent consultation with a specialist is strongly advised for definitive diagnosis.";

/// Equal-weight average of two risk levels on the ordinal scale (low 0, moderate 1, high 2).
///
/// # Arguments
///
/// * `symptoms` - Risk level of the symptom assessment.
/// * `imaging` - Risk level of the imaging assessment.
///
/// # Returns
///
/// A score in `[0, 2]`, in steps of 0.5.
pub fn combined_score(symptoms: RiskLevel, imaging: RiskLevel) -> f64 {
    FUSION_WEIGHT * f64::from(symptoms.ordinal()) + FUSION_WEIGHT * f64::from(imaging.ordinal())
}

/// Below 0.5 is low, below 1.25 is moderate, anything else is high.
pub fn combined_risk_level(score: f64) -> RiskLevel {
    if score < COMBINED_LOW_BELOW {
        RiskLevel::Low
    } else if score < COMBINED_MODERATE_BELOW {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

fn summary_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => LOW_SUMMARY,
        RiskLevel::Moderate => MODERATE_SUMMARY,
        RiskLevel::High => HIGH_SUMMARY,
    }
}

fn expect_source(result: &PredictionResult, expected: SourceType, role: &str) -> AssessmentResult<()> {
    if result.source_type != expected {
        return Err(AssessmentError::InvalidInput(format!(
            "{role} result must be of type '{expected}', got '{}'",
            result.source_type
        )));
    }
    Ok(())
}

/// Fuses one symptoms result and one imaging result.
///
/// The factor list is the present symptom factors followed by the present imaging factors,
/// truncated to eight entries without re-sorting.
///
/// # Errors
///
/// Returns `AssessmentError::InvalidInput` unless `symptoms` is a symptoms result and `imaging`
/// is an imaging result.
pub fn combine(
    symptoms: &PredictionResult,
    imaging: &PredictionResult,
) -> AssessmentResult<PredictionResult> {
    expect_source(symptoms, SourceType::Symptoms, "first")?;
    expect_source(imaging, SourceType::Imaging, "second")?;

    let score = combined_score(symptoms.risk_level, imaging.risk_level);
    let risk_level = combined_risk_level(score);
    let confidence =
        ((f64::from(symptoms.confidence) + f64::from(imaging.confidence)) / 2.0).round() as u8;

    let factors: Vec<Factor> = symptoms
        .present_factors()
        .chain(imaging.present_factors())
        .take(COMBINED_FACTOR_LIMIT)
        .cloned()
        .collect();

    tracing::debug!(score, risk = %risk_level, confidence, "fused assessments");

    Ok(PredictionResult {
        risk_level,
        confidence,
        factors,
        summary: summary_for(risk_level).to_string(),
        timestamp: Utc::now(),
        source_type: SourceType::Combined,
    })
}

/// Scores a checklist and an image identifier, then fuses the two results.
pub fn assess_combined(
    vector: &SymptomVector,
    image_identifier: &str,
) -> AssessmentResult<PredictionResult> {
    let symptoms = score_symptoms(vector);
    let imaging = score_imaging(image_identifier);
    combine(&symptoms, &imaging)
}
