//! Per-user result history and dashboard aggregates.

use crate::constants::{HISTORY_CAPACITY, TREND_WINDOW};
use conan_types::{PredictionResult, RiskLevel, SourceType};
use serde::{Deserialize, Serialize};

/// Saved results, newest first, never longer than [`HISTORY_CAPACITY`].
///
/// Serializes as a plain JSON array of results. Deserializing an over-long array keeps only the
/// newest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultHistory {
    results: Vec<PredictionResult>,
}

impl<'de> Deserialize<'de> for ResultHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut results = Vec::<PredictionResult>::deserialize(deserializer)?;
        results.truncate(HISTORY_CAPACITY);
        Ok(Self { results })
    }
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a result at the front, dropping the oldest entry once full.
    pub fn push(&mut self, result: PredictionResult) {
        self.results.insert(0, result);
        self.results.truncate(HISTORY_CAPACITY);
    }

    pub fn latest(&self) -> Option<&PredictionResult> {
        self.results.first()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[PredictionResult] {
        &self.results
    }

    pub fn summary(&self) -> DashboardSummary {
        let count = |level: RiskLevel| self.iter().filter(|r| r.risk_level == level).count();

        let average_confidence = if self.is_empty() {
            None
        } else {
            let total: u32 = self.iter().map(|r| u32::from(r.confidence)).sum();
            Some(f64::from(total) / self.len() as f64)
        };

        let trend = self
            .results
            .iter()
            .take(TREND_WINDOW)
            .rev()
            .enumerate()
            .map(|(i, r)| TrendPoint {
                index: i + 1,
                risk_score: r.risk_level.ordinal() + 1,
                confidence: r.confidence,
                source_type: r.source_type,
            })
            .collect();

        DashboardSummary {
            total: self.len(),
            low: count(RiskLevel::Low),
            moderate: count(RiskLevel::Moderate),
            high: count(RiskLevel::High),
            average_confidence,
            latest: self.latest().cloned(),
            trend,
        }
    }
}

/// Aggregate view of a user's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub average_confidence: Option<f64>,
    pub latest: Option<PredictionResult>,
    /// Up to ten most recent results, oldest first.
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// 1-based position in the trend window.
    pub index: usize,
    /// 1 for low, 2 for moderate, 3 for high.
    pub risk_score: u8,
    pub confidence: u8,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}
