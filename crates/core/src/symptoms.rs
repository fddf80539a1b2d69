//! Symptom checklist scoring.
//!
//! A checklist is scored with the weighted-sum model: the weights of every symptom answered
//! "yes" are summed and divided by the sum of all weights, giving a normalized score in
//! `[0, 1]`. The risk level and confidence follow from fixed bands on that score, and every
//! symptom is reported as a factor so callers can show the full breakdown.

use crate::constants::{SYMPTOM_CONFIDENCE_CAP, SYMPTOM_LOW_BELOW, SYMPTOM_MODERATE_BELOW};
use crate::validation::validate_symptom_answers;
use crate::weights::{max_score, SymptomKey, WEIGHT_TABLE};
use crate::{AssessmentError, AssessmentResult};
use chrono::Utc;
use conan_types::{Factor, PredictionResult, RiskLevel, SourceType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LOW_SUMMARY: &str = "Based on the reported health background and lifestyle factors, the risk indicators are minimal. Continue maintaining a healthy lifestyle and schedule regular check-ups.";
const MODERATE_SUMMARY: &str = "Several risk factors have been identified. It is advisable to consult a healthcare professional for further evaluation and consider lifestyle modifications.";
const HIGH_SUMMARY: &str = "Multiple significant risk factors are present. Prompt consultation with a qualified healthcare professional is strongly recommended for proper clinical assessment.";

/// A complete yes/no answer for each of the thirteen checklist items.
///
/// The JSON form is an object with exactly the thirteen camelCase keys; deserialization rejects
/// missing and unknown keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SymptomVector {
    pub smoking_history: bool,
    pub coughing: bool,
    pub chest_pain: bool,
    pub shortness_of_breath: bool,
    pub wheezing: bool,
    pub yellow_fingers: bool,
    pub swallowing_difficulty: bool,
    pub fatigue: bool,
    pub chronic_disease: bool,
    pub alcohol_consuming: bool,
    pub peer_pressure: bool,
    pub allergy: bool,
    pub anxiety: bool,
}

impl SymptomVector {
    /// A checklist with every item set to `value`.
    pub fn uniform(value: bool) -> Self {
        let mut vector = Self::default();
        for key in SymptomKey::ALL {
            vector.set(key, value);
        }
        vector
    }

    /// Builds a vector from the keys answered "yes"; everything else is "no".
    pub fn from_present<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = SymptomKey>,
    {
        let mut vector = Self::default();
        for key in keys {
            vector.set(key, true);
        }
        vector
    }

    /// Builds a vector from an untyped answer map.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::InvalidInput` if any key is missing or unknown, or any answer
    /// is not a boolean.
    pub fn from_answers(answers: &Map<String, Value>) -> AssessmentResult<Self> {
        validate_symptom_answers(answers)?;

        let mut vector = Self::default();
        for key in SymptomKey::ALL {
            let answer = answers.get(key.as_str()).and_then(Value::as_bool).ok_or_else(|| {
                AssessmentError::InvalidInput(format!("missing symptom keys: {key}"))
            })?;
            vector.set(key, answer);
        }
        Ok(vector)
    }

    /// Parses a JSON answer object.
    pub fn from_json_str(input: &str) -> AssessmentResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(AssessmentError::Deserialization)?;
        match value {
            Value::Object(answers) => Self::from_answers(&answers),
            _ => Err(AssessmentError::InvalidInput(
                "symptom answers must be a JSON object".into(),
            )),
        }
    }

    pub fn get(&self, key: SymptomKey) -> bool {
        match key {
            SymptomKey::SmokingHistory => self.smoking_history,
            SymptomKey::Coughing => self.coughing,
            SymptomKey::ChestPain => self.chest_pain,
            SymptomKey::ShortnessOfBreath => self.shortness_of_breath,
            SymptomKey::Wheezing => self.wheezing,
            SymptomKey::YellowFingers => self.yellow_fingers,
            SymptomKey::SwallowingDifficulty => self.swallowing_difficulty,
            SymptomKey::Fatigue => self.fatigue,
            SymptomKey::ChronicDisease => self.chronic_disease,
            SymptomKey::AlcoholConsuming => self.alcohol_consuming,
            SymptomKey::PeerPressure => self.peer_pressure,
            SymptomKey::Allergy => self.allergy,
            SymptomKey::Anxiety => self.anxiety,
        }
    }

    pub fn set(&mut self, key: SymptomKey, value: bool) {
        let slot = match key {
            SymptomKey::SmokingHistory => &mut self.smoking_history,
            SymptomKey::Coughing => &mut self.coughing,
            SymptomKey::ChestPain => &mut self.chest_pain,
            SymptomKey::ShortnessOfBreath => &mut self.shortness_of_breath,
            SymptomKey::Wheezing => &mut self.wheezing,
            SymptomKey::YellowFingers => &mut self.yellow_fingers,
            SymptomKey::SwallowingDifficulty => &mut self.swallowing_difficulty,
            SymptomKey::Fatigue => &mut self.fatigue,
            SymptomKey::ChronicDisease => &mut self.chronic_disease,
            SymptomKey::AlcoholConsuming => &mut self.alcohol_consuming,
            SymptomKey::PeerPressure => &mut self.peer_pressure,
            SymptomKey::Allergy => &mut self.allergy,
            SymptomKey::Anxiety => &mut self.anxiety,
        };
        *slot = value;
    }

    /// Number of items answered "yes".
    pub fn selected_count(&self) -> usize {
        SymptomKey::ALL.iter().filter(|k| self.get(**k)).count()
    }
}

/// Weighted score of the "yes" answers divided by the maximum possible score.
pub fn normalized_symptom_score(vector: &SymptomVector) -> f64 {
    let score: f64 = WEIGHT_TABLE
        .iter()
        .filter(|e| vector.get(e.key))
        .map(|e| e.weight)
        .sum();
    score / max_score()
}

pub fn symptom_risk_level(normalized: f64) -> RiskLevel {
    if normalized < SYMPTOM_LOW_BELOW {
        RiskLevel::Low
    } else if normalized < SYMPTOM_MODERATE_BELOW {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Confidence for a symptom result.
///
/// Confidence grows with the score inside each tier's band and never exceeds the cap.
///
/// # Arguments
///
/// * `level` - The risk level derived from `normalized`.
/// * `normalized` - The normalized symptom score in `[0, 1]`.
///
/// # Returns
///
/// A whole percentage, rounded half away from zero and clamped to 97.
pub fn symptom_confidence(level: RiskLevel, normalized: f64) -> u8 {
    let raw = match level {
        RiskLevel::Low => 85.0 + normalized * 20.0,
        RiskLevel::Moderate => 70.0 + normalized * 15.0,
        RiskLevel::High => 75.0 + normalized * 10.0,
    };
    raw.round().clamp(0.0, f64::from(SYMPTOM_CONFIDENCE_CAP)) as u8
}

fn summary_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => LOW_SUMMARY,
        RiskLevel::Moderate => MODERATE_SUMMARY,
        RiskLevel::High => HIGH_SUMMARY,
    }
}

/// Scores a complete symptom checklist.
///
/// The result lists all thirteen symptoms as factors, highest impact first; symptoms of equal
/// impact keep their checklist order ([`SymptomKey::CHECKLIST_ORDER`]).
///
/// # Arguments
///
/// * `vector` - A complete yes/no checklist.
///
/// # Returns
///
/// A `PredictionResult` of type `symptoms` with a confidence between 70 and 97.
pub fn score_symptoms(vector: &SymptomVector) -> PredictionResult {
    let normalized = normalized_symptom_score(vector);
    let risk_level = symptom_risk_level(normalized);
    let confidence = symptom_confidence(risk_level, normalized);

    let mut factors: Vec<Factor> = SymptomKey::CHECKLIST_ORDER
        .iter()
        .map(|&key| {
            let entry = key.weight_entry();
            Factor::new(entry.label, entry.impact(), vector.get(key))
        })
        .collect();
    // Stable: equal tiers keep checklist order.
    factors.sort_by_key(|f| f.impact.rank());

    tracing::debug!(
        normalized,
        risk = %risk_level,
        confidence,
        selected = vector.selected_count(),
        "scored symptom checklist"
    );

    PredictionResult {
        risk_level,
        confidence,
        factors,
        summary: summary_for(risk_level).to_string(),
        timestamp: Utc::now(),
        source_type: SourceType::Symptoms,
    }
}

/// Scores an untyped answer map, rejecting incomplete or malformed input.
pub fn score_symptom_answers(answers: &Map<String, Value>) -> AssessmentResult<PredictionResult> {
    let vector = SymptomVector::from_answers(answers)?;
    Ok(score_symptoms(&vector))
}
