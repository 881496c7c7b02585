//! Body measurement profile value object.

use serde::{Deserialize, Serialize};

use super::units::{inches_to_cm, AVERAGE_TORSO_RATIO};
use crate::domain::foundation::{Confidence, ValidationError};

/// Confidence below which a photo-derived profile should not be trusted.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Typical adult ranges as (field, min, max). Values outside are reported,
/// never rejected.
pub const PLAUSIBLE_RANGES: [(&str, f64, f64); 5] = [
    ("height", 140.0, 220.0),
    ("chest", 70.0, 150.0),
    ("waist", 60.0, 140.0),
    ("shoulder", 35.0, 60.0),
    ("torso_ratio", 0.4, 0.7),
];

/// How a profile came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSource {
    /// Typed in by the user.
    Manual,
    /// Extracted from a photo by the measurement extractor.
    PhotoExtraction,
}

/// How far a caller may rely on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    Trusted,
    /// The detection was unsure; ask for a clearer photo.
    LowConfidence,
}

/// One subject's body measurements, in centimeters.
///
/// Profiles are immutable. A new measurement produces a new profile.
/// Deserialized profiles are validated like manually entered ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct BodyMeasurementProfile {
    height: f64,
    chest: f64,
    waist: f64,
    shoulder: f64,
    torso_ratio: f64,
    confidence: Option<Confidence>,
    source: MeasurementSource,
}

#[derive(Deserialize)]
struct ProfileRecord {
    height: f64,
    chest: f64,
    waist: f64,
    shoulder: f64,
    torso_ratio: f64,
    #[serde(default)]
    confidence: Option<f64>,
    source: MeasurementSource,
}

impl TryFrom<ProfileRecord> for BodyMeasurementProfile {
    type Error = ValidationError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let mut profile = Self::manual_with_torso_ratio(
            record.height,
            record.chest,
            record.waist,
            record.shoulder,
            record.torso_ratio,
        )?;
        profile.confidence = record.confidence.map(Confidence::try_new).transpose()?;
        profile.source = record.source;
        Ok(profile)
    }
}

impl BodyMeasurementProfile {
    /// Creates a manually entered profile.
    ///
    /// Torso ratio defaults to the adult average since it is rarely known.
    pub fn manual(
        height: f64,
        chest: f64,
        waist: f64,
        shoulder: f64,
    ) -> Result<Self, ValidationError> {
        Self::manual_with_torso_ratio(height, chest, waist, shoulder, AVERAGE_TORSO_RATIO)
    }

    /// Creates a manually entered profile with a known torso ratio.
    pub fn manual_with_torso_ratio(
        height: f64,
        chest: f64,
        waist: f64,
        shoulder: f64,
        torso_ratio: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            height: ValidationError::require_positive("height", height)?,
            chest: ValidationError::require_positive("chest", chest)?,
            waist: ValidationError::require_positive("waist", waist)?,
            shoulder: ValidationError::require_positive("shoulder", shoulder)?,
            torso_ratio: ValidationError::require_positive("torso_ratio", torso_ratio)?,
            confidence: None,
            source: MeasurementSource::Manual,
        })
    }

    /// Creates a manually entered profile from inch values.
    pub fn manual_in_inches(
        height: f64,
        chest: f64,
        waist: f64,
        shoulder: f64,
    ) -> Result<Self, ValidationError> {
        Self::manual(
            inches_to_cm(height),
            inches_to_cm(chest),
            inches_to_cm(waist),
            inches_to_cm(shoulder),
        )
    }

    /// Creates a photo-derived profile. Only the extractor builds these.
    pub(crate) fn extracted(
        height: f64,
        chest: f64,
        waist: f64,
        shoulder: f64,
        torso_ratio: f64,
        confidence: Confidence,
    ) -> Self {
        Self {
            height,
            chest,
            waist,
            shoulder,
            torso_ratio,
            confidence: Some(confidence),
            source: MeasurementSource::PhotoExtraction,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chest(&self) -> f64 {
        self.chest
    }

    pub fn waist(&self) -> f64 {
        self.waist
    }

    pub fn shoulder(&self) -> f64 {
        self.shoulder
    }

    pub fn torso_ratio(&self) -> f64 {
        self.torso_ratio
    }

    /// Detection confidence; `None` for manually entered profiles.
    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn source(&self) -> MeasurementSource {
        self.source
    }

    /// Confidence to act on: manual profiles are fully trusted.
    pub fn effective_confidence(&self) -> Confidence {
        self.confidence.unwrap_or(Confidence::FULL)
    }

    /// Classifies the profile against a minimum confidence.
    pub fn reliability(&self, min_confidence: f64) -> Reliability {
        if self.effective_confidence().is_below(min_confidence) {
            Reliability::LowConfidence
        } else {
            Reliability::Trusted
        }
    }

    /// Lists the measurements that fall outside typical adult ranges.
    ///
    /// Photo extraction from an odd angle is the usual cause; callers may
    /// surface these as warnings.
    pub fn plausibility_issues(&self) -> Vec<ValidationError> {
        let values = [
            self.height,
            self.chest,
            self.waist,
            self.shoulder,
            self.torso_ratio,
        ];
        PLAUSIBLE_RANGES
            .iter()
            .zip(values)
            .filter(|((_, min, max), value)| value < min || value > max)
            .map(|((field, min, max), value)| ValidationError::out_of_range(*field, *min, *max, value))
            .collect()
    }
}
