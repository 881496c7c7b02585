//! Fit Scorer - Ease-deviation penalty scoring.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;
use crate::domain::measurement::BodyMeasurementProfile;

use super::preference::{EaseTable, FitPreference};
use super::size_chart::SizeChartEntry;

/// Points deducted per centimeter of deviation from the ease target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    pub chest: f64,
    pub shoulder: f64,
    pub waist: f64,
}

impl PenaltyWeights {
    pub const STANDARD: PenaltyWeights = PenaltyWeights {
        chest: 4.0,
        shoulder: 6.0,
        waist: 3.0,
    };
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Scorer for a single size.
pub struct FitScorer;

impl FitScorer {
    /// Scores a size with the standard ease table and weights.
    pub fn score(
        body: &BodyMeasurementProfile,
        garment: &SizeChartEntry,
        preference: FitPreference,
    ) -> Percentage {
        Self::score_with(
            body,
            garment,
            preference,
            &EaseTable::STANDARD,
            &PenaltyWeights::STANDARD,
        )
    }

    /// Scores a size with explicit ease targets and weights.
    pub fn score_with(
        body: &BodyMeasurementProfile,
        garment: &SizeChartEntry,
        preference: FitPreference,
        ease: &EaseTable,
        weights: &PenaltyWeights,
    ) -> Percentage {
        Percentage::from_score(Self::raw_score(body, garment, preference, ease, weights))
    }

    /// Unclamped, unrounded score: 100 minus the weighted ease deviations.
    ///
    /// # Edge Cases
    ///
    /// - Waist contributes nothing when the chart entry lacks it.
    /// - May be negative for badly mismatched sizes; callers clamp.
    pub fn raw_score(
        body: &BodyMeasurementProfile,
        garment: &SizeChartEntry,
        preference: FitPreference,
        ease: &EaseTable,
        weights: &PenaltyWeights,
    ) -> f64 {
        let target = ease.target(preference);

        let chest_dev = (garment.chest() - body.chest() - target.chest).abs();
        let shoulder_dev = (garment.shoulder() - body.shoulder() - target.shoulder).abs();
        let waist_dev = garment
            .waist()
            .map(|w| (w - body.waist() - target.waist).abs())
            .unwrap_or(0.0);

        let penalty =
            chest_dev * weights.chest + shoulder_dev * weights.shoulder + waist_dev * weights.waist;

        100.0 - penalty
    }

    /// Clamps a raw score to the 0–100 range without rounding.
    pub fn clamp(raw: f64) -> f64 {
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 100.0)
        }
    }
}
