//! Pose detection configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::measurement::{
    DEFAULT_REFERENCE_HEIGHT_CM, LOW_CONFIDENCE_THRESHOLD, MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM,
};

const MAX_TIMEOUT_MS: u64 = 120_000;

/// Pose detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Deadline for a single detection call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Provider confidence below which a profile is flagged
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Reference height used when the caller supplies none
    #[serde(default = "default_reference_height_cm")]
    pub default_reference_height_cm: f64,

    /// Recorded landmarks below this visibility are ignored
    pub min_visibility: Option<f64>,
}

impl DetectionConfig {
    /// Get the detection deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate detection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ValidationError::InvalidDetectionTimeout);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ValidationError::InvalidMinConfidence);
        }
        if let Some(visibility) = self.min_visibility {
            if !(0.0..=1.0).contains(&visibility) {
                return Err(ValidationError::InvalidMinVisibility);
            }
        }
        let height = self.default_reference_height_cm;
        if height.is_nan() || height <= MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM {
            return Err(ValidationError::InvalidReferenceHeight);
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            min_confidence: default_min_confidence(),
            default_reference_height_cm: default_reference_height_cm(),
            min_visibility: None,
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_min_confidence() -> f64 {
    LOW_CONFIDENCE_THRESHOLD
}

fn default_reference_height_cm() -> f64 {
    DEFAULT_REFERENCE_HEIGHT_CM
}
