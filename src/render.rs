//! Plain-text and JSON rendering of engine output.

use chrono::Local;
use conan_core::constants::HISTORY_CAPACITY;
use conan_core::{DashboardSummary, Settings, User};
use conan_types::{PredictionResult, RiskLevel};
use serde::Serialize;
use std::io::{self, Write};

const DISCLAIMER: &str = "Screening tool only. This assessment does not constitute a medical diagnosis; consult a qualified healthcare professional.";

/// JSON envelope for a freshly computed result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutput<'a> {
    pub result: &'a PredictionResult,
    pub saved: bool,
}

fn risk_heading(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "LOW RISK",
        RiskLevel::Moderate => "MODERATE RISK",
        RiskLevel::High => "HIGH RISK",
    }
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn write_result<W: Write>(out: &mut W, result: &PredictionResult) -> io::Result<()> {
    writeln!(
        out,
        "{} ({}% confidence)",
        risk_heading(result.risk_level),
        result.confidence
    )?;
    writeln!(
        out,
        "Assessment: {}  |  {}",
        result.source_type,
        result.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    )?;
    writeln!(out)?;
    writeln!(out, "{}", result.summary)?;
    writeln!(out)?;
    writeln!(out, "Factors:")?;
    for factor in &result.factors {
        let mark = if factor.present { "x" } else { " " };
        writeln!(out, "  [{mark}] {:<34} {}", factor.name, factor.impact)?;
    }
    writeln!(out)?;
    writeln!(out, "{DISCLAIMER}")
}

pub fn write_saved_notice<W: Write>(out: &mut W, user: Option<&User>) -> io::Result<()> {
    match user {
        Some(user) => writeln!(
            out,
            "Saved to history for {} ({} of {HISTORY_CAPACITY}).",
            user.name,
            user.results.len()
        ),
        None => writeln!(out, "Sign in with `conan login` to save and track results over time."),
    }
}

pub fn write_history<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    if user.results.is_empty() {
        return writeln!(out, "No saved results for {}.", user.name);
    }

    writeln!(out, "Saved results for {} (newest first):", user.name)?;
    for (i, result) in user.results.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {}  {:<8} {:<8} {:>3}%",
            i + 1,
            result.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            result.source_type,
            result.risk_level,
            result.confidence
        )?;
    }
    Ok(())
}

pub fn write_dashboard<W: Write>(out: &mut W, summary: &DashboardSummary) -> io::Result<()> {
    if summary.total == 0 {
        return writeln!(out, "Complete an assessment to see your results and trends here.");
    }

    writeln!(out, "Total assessments: {}", summary.total)?;
    writeln!(
        out,
        "Low: {}  Moderate: {}  High: {}",
        summary.low, summary.moderate, summary.high
    )?;
    if let Some(avg) = summary.average_confidence {
        writeln!(out, "Average confidence: {avg:.1}%")?;
    }
    if let Some(latest) = &summary.latest {
        writeln!(
            out,
            "Latest: {} ({}, {}%)",
            latest.risk_level, latest.source_type, latest.confidence
        )?;
    }

    if summary.trend.len() > 1 {
        writeln!(out)?;
        writeln!(out, "Trend (oldest to newest):")?;
        for point in &summary.trend {
            let bar = "#".repeat(usize::from(point.risk_score) * 4);
            writeln!(
                out,
                "  #{:<3} {:<12} {:>3}%  {}",
                point.index, bar, point.confidence, point.source_type
            )?;
        }
    }
    Ok(())
}

pub fn write_settings<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    writeln!(
        out,
        "Font size: {:?} ({}px)",
        settings.font_size,
        settings.font_size.css_pixels()
    )?;
    writeln!(out, "High contrast: {}", settings.contrast_mode)?;
    writeln!(out, "Privacy consent: {}", settings.privacy_consented)
}
