//! Recommendation Selector - Ranks every size of a chart.
//!
//! Each size is scored, banded, and explained; the best size is the highest
//! score with ties going to the earliest chart row.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Percentage;
use crate::domain::measurement::BodyMeasurementProfile;

use super::preference::{EaseTable, FitPreference};
use super::scorer::{FitScorer, PenaltyWeights};
use super::size_chart::SizeChartEntry;
use super::zone::{FitStatus, FitZone, FitZoneCalculator};

/// Minimum score for a perfect fit.
pub const PERFECT_THRESHOLD: f64 = 85.0;

/// Minimum score for a good fit.
pub const GOOD_THRESHOLD: f64 = 70.0;

/// Minimum score for an acceptable fit.
pub const ACCEPTABLE_THRESHOLD: f64 = 50.0;

/// Recommendation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    Perfect,
    Good,
    Acceptable,
    NotRecommended,
}

impl RecommendationType {
    /// Bands a clamped, unrounded score.
    pub fn from_score(score: f64) -> Self {
        if score >= PERFECT_THRESHOLD {
            RecommendationType::Perfect
        } else if score >= GOOD_THRESHOLD {
            RecommendationType::Good
        } else if score >= ACCEPTABLE_THRESHOLD {
            RecommendationType::Acceptable
        } else {
            RecommendationType::NotRecommended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Perfect => "perfect",
            RecommendationType::Good => "good",
            RecommendationType::Acceptable => "acceptable",
            RecommendationType::NotRecommended => "not-recommended",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analysis of one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeFitAnalysis {
    pub size: String,
    pub score: Percentage,
    pub fit_zones: Vec<FitZone>,
    pub recommendation_type: RecommendationType,
    pub explanation: String,
}

impl SizeFitAnalysis {
    /// Zones with the given status.
    pub fn zones_with_status(&self, status: FitStatus) -> impl Iterator<Item = &FitZone> {
        self.fit_zones.iter().filter(move |z| z.status == status)
    }
}

/// Tuning for the selector. Defaults reproduce the standard tables.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectorSettings {
    pub ease: EaseTable,
    pub weights: PenaltyWeights,
}

/// Selector that analyzes and ranks sizes.
pub struct RecommendationSelector;

impl RecommendationSelector {
    /// Analyzes one size.
    pub fn analyze(
        body: &BodyMeasurementProfile,
        garment: &SizeChartEntry,
        preference: FitPreference,
        settings: &SelectorSettings,
    ) -> SizeFitAnalysis {
        let fit_zones = FitZoneCalculator::zones(body, garment);
        let raw = FitScorer::raw_score(body, garment, preference, &settings.ease, &settings.weights);
        let recommendation_type = RecommendationType::from_score(FitScorer::clamp(raw));
        let explanation = Self::explain(recommendation_type, &fit_zones, preference);

        SizeFitAnalysis {
            size: garment.size().to_string(),
            score: Percentage::from_score(raw),
            fit_zones,
            recommendation_type,
            explanation,
        }
    }

    /// Analyzes every size, preserving chart order.
    pub fn analyze_all(
        body: &BodyMeasurementProfile,
        chart: &[SizeChartEntry],
        preference: FitPreference,
    ) -> Vec<SizeFitAnalysis> {
        Self::analyze_all_with(body, chart, preference, &SelectorSettings::default())
    }

    /// Analyzes every size with explicit settings.
    pub fn analyze_all_with(
        body: &BodyMeasurementProfile,
        chart: &[SizeChartEntry],
        preference: FitPreference,
        settings: &SelectorSettings,
    ) -> Vec<SizeFitAnalysis> {
        chart
            .iter()
            .map(|garment| Self::analyze(body, garment, preference, settings))
            .collect()
    }

    /// Picks the highest-scoring analysis.
    ///
    /// # Edge Cases
    ///
    /// - Ties go to the earliest analysis.
    /// - Empty input returns `None`.
    pub fn best_size(analyses: &[SizeFitAnalysis]) -> Option<&SizeFitAnalysis> {
        analyses.iter().fold(None, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
    }

    /// Builds the human-readable explanation for a band.
    pub fn explain(
        recommendation_type: RecommendationType,
        zones: &[FitZone],
        preference: FitPreference,
    ) -> String {
        let tight = areas_with(zones, FitStatus::Tight);
        let loose = areas_with(zones, FitStatus::Loose);

        match recommendation_type {
            RecommendationType::Perfect => format!(
                "Perfect fit! All measurements align well with your {} fit preference.",
                preference
            ),
            RecommendationType::Good => {
                let mut text = String::from("Good fit with minor adjustments.");
                if let Some(areas) = &tight {
                    text.push_str(&format!(" Slightly tight at {}.", areas));
                }
                if let Some(areas) = &loose {
                    text.push_str(&format!(" Slightly loose at {}.", areas));
                }
                text
            }
            RecommendationType::Acceptable => {
                "Acceptable fit but not ideal. Consider trying a different size for better comfort."
                    .to_string()
            }
            RecommendationType::NotRecommended => match (tight, loose) {
                (Some(areas), _) => format!("Not recommended. Too tight at {}.", areas),
                (None, Some(areas)) => format!("Not recommended. Too loose at {}.", areas),
                (None, None) => format!(
                    "Not recommended. Measurements are far from your {} fit preference.",
                    preference
                ),
            },
        }
    }
}

fn areas_with(zones: &[FitZone], status: FitStatus) -> Option<String> {
    let areas: Vec<&str> = zones
        .iter()
        .filter(|z| z.status == status)
        .map(|z| z.area.as_str())
        .collect();
    if areas.is_empty() {
        None
    } else {
        Some(areas.join(", "))
    }
}
