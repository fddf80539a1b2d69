//! Symptom weight table.
//!
//! Each of the thirteen symptom keys carries a fixed positive weight (its contribution to the
//! symptom score) and a display label. The impact tier shown to users is derived from the weight
//! rather than stored, so the table cannot disagree with the tier thresholds.

use crate::constants::{HIGH_IMPACT_WEIGHT, MEDIUM_IMPACT_WEIGHT};
use conan_types::ImpactTier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The symptom checklist keys, in canonical table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymptomKey {
    SmokingHistory,
    Coughing,
    ChestPain,
    ShortnessOfBreath,
    Wheezing,
    YellowFingers,
    SwallowingDifficulty,
    Fatigue,
    ChronicDisease,
    AlcoholConsuming,
    PeerPressure,
    Allergy,
    Anxiety,
}

impl SymptomKey {
    pub const ALL: [SymptomKey; 13] = [
        SymptomKey::SmokingHistory,
        SymptomKey::Coughing,
        SymptomKey::ChestPain,
        SymptomKey::ShortnessOfBreath,
        SymptomKey::Wheezing,
        SymptomKey::YellowFingers,
        SymptomKey::SwallowingDifficulty,
        SymptomKey::Fatigue,
        SymptomKey::ChronicDisease,
        SymptomKey::AlcoholConsuming,
        SymptomKey::PeerPressure,
        SymptomKey::Allergy,
        SymptomKey::Anxiety,
    ];

    /// The order the checklist presents its items in. Factor lists follow this order within
    /// each impact tier.
    pub const CHECKLIST_ORDER: [SymptomKey; 13] = [
        SymptomKey::Coughing,
        SymptomKey::ShortnessOfBreath,
        SymptomKey::SwallowingDifficulty,
        SymptomKey::ChestPain,
        SymptomKey::Wheezing,
        SymptomKey::Fatigue,
        SymptomKey::Allergy,
        SymptomKey::SmokingHistory,
        SymptomKey::YellowFingers,
        SymptomKey::Anxiety,
        SymptomKey::PeerPressure,
        SymptomKey::ChronicDisease,
        SymptomKey::AlcoholConsuming,
    ];

    /// The camelCase key used in JSON answer maps.
    pub fn as_str(self) -> &'static str {
        match self {
            SymptomKey::SmokingHistory => "smokingHistory",
            SymptomKey::Coughing => "coughing",
            SymptomKey::ChestPain => "chestPain",
            SymptomKey::ShortnessOfBreath => "shortnessOfBreath",
            SymptomKey::Wheezing => "wheezing",
            SymptomKey::YellowFingers => "yellowFingers",
            SymptomKey::SwallowingDifficulty => "swallowingDifficulty",
            SymptomKey::Fatigue => "fatigue",
            SymptomKey::ChronicDisease => "chronicDisease",
            SymptomKey::AlcoholConsuming => "alcoholConsuming",
            SymptomKey::PeerPressure => "peerPressure",
            SymptomKey::Allergy => "allergy",
            SymptomKey::Anxiety => "anxiety",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn weight_entry(self) -> &'static WeightEntry {
        &WEIGHT_TABLE[self.index()]
    }
}

impl fmt::Display for SymptomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymptomKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymptomKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown symptom key '{s}'"))
    }
}

/// One row of the weight table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    pub key: SymptomKey,
    pub weight: f64,
    pub label: &'static str,
}

impl WeightEntry {
    pub fn impact(&self) -> ImpactTier {
        impact_for_weight(self.weight)
    }
}

/// Weighted-sum model. Rows are indexed by `SymptomKey as usize`.
pub static WEIGHT_TABLE: [WeightEntry; 13] = [
    WeightEntry { key: SymptomKey::SmokingHistory, weight: 3.0, label: "Smoking History" },
    WeightEntry { key: SymptomKey::Coughing, weight: 2.8, label: "Persistent Coughing" },
    WeightEntry { key: SymptomKey::ChestPain, weight: 2.6, label: "Chest Pain" },
    WeightEntry { key: SymptomKey::ShortnessOfBreath, weight: 2.5, label: "Shortness of Breath" },
    WeightEntry { key: SymptomKey::Wheezing, weight: 2.2, label: "Wheezing" },
    WeightEntry { key: SymptomKey::YellowFingers, weight: 2.0, label: "Yellow Fingers" },
    WeightEntry { key: SymptomKey::SwallowingDifficulty, weight: 1.8, label: "Swallowing Difficulty" },
    WeightEntry { key: SymptomKey::Fatigue, weight: 1.5, label: "Fatigue" },
    WeightEntry { key: SymptomKey::ChronicDisease, weight: 1.5, label: "Chronic Disease" },
    WeightEntry { key: SymptomKey::AlcoholConsuming, weight: 1.2, label: "Alcohol Consumption" },
    WeightEntry { key: SymptomKey::PeerPressure, weight: 1.0, label: "Peer Pressure (Smoking-related)" },
    WeightEntry { key: SymptomKey::Allergy, weight: 0.8, label: "Allergy" },
    WeightEntry { key: SymptomKey::Anxiety, weight: 0.7, label: "Anxiety" },
];

/// Sum of every weight, accumulated in table order.
///
/// Scoring accumulates present weights in the same order, so an all-true checklist normalizes
/// to exactly 1.0.
pub fn max_score() -> f64 {
    WEIGHT_TABLE.iter().map(|e| e.weight).sum()
}

/// Maps a symptom weight to the impact tier shown to users.
///
/// # Arguments
///
/// * `weight` - A weight from the table.
///
/// # Returns
///
/// `High` from 2.5, `Medium` from 1.5, `Low` below that.
pub fn impact_for_weight(weight: f64) -> ImpactTier {
    if weight >= HIGH_IMPACT_WEIGHT {
        ImpactTier::High
    } else if weight >= MEDIUM_IMPACT_WEIGHT {
        ImpactTier::Medium
    } else {
        ImpactTier::Low
    }
}
