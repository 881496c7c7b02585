//! Girth estimation from shoulder width.
//!
//! Chest and waist girth cannot be seen in a single frontal photo. They are
//! derived from the measured shoulder width by a [`BodyShapeEstimator`].

use std::fmt::Debug;

/// Chest and waist girth estimate, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GirthEstimate {
    pub chest: f64,
    pub waist: f64,
}

/// Estimates girths that a frontal photo cannot measure directly.
pub trait BodyShapeEstimator: Debug + Send + Sync {
    /// Estimates chest and waist girth from shoulder width (cm).
    fn estimate(&self, shoulder_cm: f64) -> GirthEstimate;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

/// Fixed tailoring multipliers applied to shoulder width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoulderRatioEstimator {
    pub chest_ratio: f64,
    pub waist_ratio: f64,
}

impl ShoulderRatioEstimator {
    pub const DEFAULT_CHEST_RATIO: f64 = 2.15;
    pub const DEFAULT_WAIST_RATIO: f64 = 1.9;

    pub fn new(chest_ratio: f64, waist_ratio: f64) -> Self {
        Self {
            chest_ratio,
            waist_ratio,
        }
    }
}

impl Default for ShoulderRatioEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHEST_RATIO, Self::DEFAULT_WAIST_RATIO)
    }
}

impl BodyShapeEstimator for ShoulderRatioEstimator {
    fn estimate(&self, shoulder_cm: f64) -> GirthEstimate {
        GirthEstimate {
            chest: shoulder_cm * self.chest_ratio,
            waist: shoulder_cm * self.waist_ratio,
        }
    }

    fn name(&self) -> &'static str {
        "shoulder_ratio"
    }
}
