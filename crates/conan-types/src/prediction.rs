//! Prediction result model.
//!
//! These types are the persisted, JSON-compatible form of every assessment:
//!
//! ```json
//! {
//!   "riskLevel": "moderate",
//!   "confidence": 78,
//!   "factors": [{ "name": "Chest Pain", "impact": "high", "present": true }],
//!   "summary": "...",
//!   "timestamp": "2026-01-01T12:00:00Z",
//!   "type": "symptoms"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative screening risk, ordered `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Ordinal used for fusion: low=0, moderate=1, high=2.
    pub fn ordinal(self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Coarse display bucket for a factor's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    High,
    Medium,
    Low,
}

impl ImpactTier {
    /// Sort rank, highest impact first.
    pub fn rank(self) -> u8 {
        match self {
            ImpactTier::High => 0,
            ImpactTier::Medium => 1,
            ImpactTier::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactTier::High => "high",
            ImpactTier::Medium => "medium",
            ImpactTier::Low => "low",
        }
    }
}

impl fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which scorer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Symptoms,
    Imaging,
    Combined,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Symptoms => "symptoms",
            SourceType::Imaging => "imaging",
            SourceType::Combined => "combined",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One named risk indicator in a result's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: ImpactTier,
    pub present: bool,
}

impl Factor {
    pub fn new(name: impl Into<String>, impact: ImpactTier, present: bool) -> Self {
        Self {
            name: name.into(),
            impact,
            present,
        }
    }
}

/// Output of a scorer or of the fusion combiner.
///
/// Results are created fresh on every call and never mutated by the engine afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub risk_level: RiskLevel,

    /// Self-reported certainty as an integer percentage (0..=100).
    pub confidence: u8,

    /// Breakdown in display order.
    pub factors: Vec<Factor>,

    pub summary: String,

    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub source_type: SourceType,
}

impl PredictionResult {
    /// Factors flagged as present, in display order.
    pub fn present_factors(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter().filter(|f| f.present)
    }
}
