//! Measurement Extractor - Converts pixel-space landmarks into centimeters.
//!
//! # Algorithm
//!
//! 1. Scale landmarks into pixel space for the actual image size
//! 2. Pixel body height = mean(nose→left ankle, nose→right ankle)
//! 3. Calibration scale (cm/px) = reference height / pixel body height
//! 4. Shoulder width = shoulder pixel distance × scale
//! 5. Chest/waist estimated from shoulder width
//! 6. Torso ratio = shoulder-midpoint→hip-midpoint / pixel body height

use std::sync::Arc;

use thiserror::Error;

use super::estimator::{BodyShapeEstimator, ShoulderRatioEstimator};
use super::landmarks::{DetectedPose, LandmarkName, LandmarkSet, PoseDetection};
use super::profile::BodyMeasurementProfile;
use crate::domain::foundation::{Confidence, DomainError, ErrorCode};

/// Reference height assumed when the user did not supply one.
pub const DEFAULT_REFERENCE_HEIGHT_CM: f64 = 170.0;

/// Reference heights at or below this are treated as missing.
pub const MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM: f64 = 50.0;

/// Result of running extraction over one image.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// A body was found and measured.
    Measured(BodyMeasurementProfile),
    /// The provider found no body in the image.
    NoPoseDetected,
}

impl ExtractionOutcome {
    /// Returns the measured profile, if any.
    pub fn profile(&self) -> Option<&BodyMeasurementProfile> {
        match self {
            ExtractionOutcome::Measured(profile) => Some(profile),
            ExtractionOutcome::NoPoseDetected => None,
        }
    }

    /// Consumes the outcome, returning the measured profile, if any.
    pub fn into_profile(self) -> Option<BodyMeasurementProfile> {
        match self {
            ExtractionOutcome::Measured(profile) => Some(profile),
            ExtractionOutcome::NoPoseDetected => None,
        }
    }

    pub fn is_no_pose(&self) -> bool {
        matches!(self, ExtractionOutcome::NoPoseDetected)
    }
}

/// A pose was found but could not be turned into measurements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("missing required landmarks: {}", join_names(.0))]
    MissingLandmarks(Vec<LandmarkName>),

    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("pixel body height is zero; cannot calibrate")]
    DegenerateBodyHeight,
}

fn join_names(names: &[LandmarkName]) -> String {
    names
        .iter()
        .map(LandmarkName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ExtractionError> for DomainError {
    fn from(err: ExtractionError) -> Self {
        let code = match &err {
            ExtractionError::MissingLandmarks(_) => ErrorCode::LandmarksIncomplete,
            ExtractionError::InvalidImageSize { .. } => ErrorCode::ValidationFailed,
            ExtractionError::DegenerateBodyHeight => ErrorCode::DegenerateCalibration,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Picks the reference height: the supplied one if plausible, else the default.
pub fn resolve_reference_height(reference_height_cm: Option<f64>) -> f64 {
    match reference_height_cm {
        Some(h) if h.is_finite() && h > MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM => h,
        _ => DEFAULT_REFERENCE_HEIGHT_CM,
    }
}

/// Centimeters per pixel for a body spanning `pixel_body_height` pixels.
pub fn calibration_scale(
    reference_height_cm: f64,
    pixel_body_height: f64,
) -> Result<f64, ExtractionError> {
    if !pixel_body_height.is_finite() || pixel_body_height <= 0.0 {
        return Err(ExtractionError::DegenerateBodyHeight);
    }
    Ok(reference_height_cm / pixel_body_height)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Turns landmark detections into body measurement profiles.
#[derive(Debug, Clone)]
pub struct MeasurementExtractor {
    estimator: Arc<dyn BodyShapeEstimator>,
}

impl Default for MeasurementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementExtractor {
    /// Creates an extractor using the shoulder-ratio girth estimator.
    pub fn new() -> Self {
        Self::with_estimator(Arc::new(ShoulderRatioEstimator::default()))
    }

    /// Creates an extractor with a custom girth estimator.
    pub fn with_estimator(estimator: Arc<dyn BodyShapeEstimator>) -> Self {
        Self { estimator }
    }

    /// Returns the girth estimator in use.
    pub fn estimator(&self) -> &dyn BodyShapeEstimator {
        self.estimator.as_ref()
    }

    /// Measures the primary pose of a detection.
    ///
    /// # Edge Cases
    /// - No pose: `Ok(NoPoseDetected)`, not an error
    /// - Low provider confidence: measured and reported as-is
    /// - Missing required landmarks: `Err(MissingLandmarks)`
    pub fn extract(
        &self,
        detection: &PoseDetection,
        image_width: u32,
        image_height: u32,
        reference_height_cm: Option<f64>,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        match detection.primary() {
            None => Ok(ExtractionOutcome::NoPoseDetected),
            Some(pose) => self
                .measure(pose, image_width, image_height, reference_height_cm)
                .map(ExtractionOutcome::Measured),
        }
    }

    /// Measures a single pose.
    pub fn measure(
        &self,
        pose: &DetectedPose,
        image_width: u32,
        image_height: u32,
        reference_height_cm: Option<f64>,
    ) -> Result<BodyMeasurementProfile, ExtractionError> {
        if image_width == 0 || image_height == 0 {
            return Err(ExtractionError::InvalidImageSize {
                width: image_width,
                height: image_height,
            });
        }

        let missing = pose.landmarks.missing_required();
        if !missing.is_empty() {
            return Err(ExtractionError::MissingLandmarks(missing));
        }

        let pixels = pose.landmarks.to_pixel_space(image_width, image_height);
        let raw = RawBodyMetrics::from_pixels(&pixels)?;

        let reference_height = resolve_reference_height(reference_height_cm);
        let scale = calibration_scale(reference_height, raw.body_height_px)?;

        let shoulder_cm = raw.shoulder_width_px * scale;
        let girth = self.estimator.estimate(shoulder_cm);
        let torso_ratio = raw.torso_px / raw.body_height_px;

        Ok(BodyMeasurementProfile::extracted(
            reference_height.round(),
            girth.chest.round(),
            girth.waist.round(),
            shoulder_cm.round(),
            round_to(torso_ratio, 2),
            pose.confidence.unwrap_or(Confidence::FULL),
        ))
    }
}

/// Pixel-space distances read off one landmark set.
#[derive(Debug, Clone, Copy)]
struct RawBodyMetrics {
    body_height_px: f64,
    shoulder_width_px: f64,
    torso_px: f64,
}

impl RawBodyMetrics {
    fn from_pixels(set: &LandmarkSet) -> Result<Self, ExtractionError> {
        let point = |name: LandmarkName| {
            set.get(name)
                .copied()
                .ok_or_else(|| ExtractionError::MissingLandmarks(vec![name]))
        };

        let nose = point(LandmarkName::Nose)?;
        let left_shoulder = point(LandmarkName::LeftShoulder)?;
        let right_shoulder = point(LandmarkName::RightShoulder)?;
        let left_hip = point(LandmarkName::LeftHip)?;
        let right_hip = point(LandmarkName::RightHip)?;
        let left_ankle = point(LandmarkName::LeftAnkle)?;
        let right_ankle = point(LandmarkName::RightAnkle)?;

        let body_height_px = (nose.distance(&left_ankle) + nose.distance(&right_ankle)) / 2.0;
        let shoulder_width_px = left_shoulder.distance(&right_shoulder);
        let torso_px = left_shoulder
            .midpoint(&right_shoulder)
            .planar_distance(&left_hip.midpoint(&right_hip));

        Ok(Self {
            body_height_px,
            shoulder_width_px,
            torso_px,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::measurement::landmarks::{CoordinateSpace, Landmark};
    use crate::domain::measurement::profile::MeasurementSource;

    /// Upright figure in a 1000x2000 pixel frame: nose at y=200,
    /// ankles at y=1900, shoulders 200 px apart, hips at y=900.
    fn standing_pose() -> LandmarkSet {
        LandmarkSet::new(CoordinateSpace::Pixel)
            .with(LandmarkName::Nose, Landmark::new(500.0, 200.0))
            .with(LandmarkName::LeftShoulder, Landmark::new(600.0, 400.0))
            .with(LandmarkName::RightShoulder, Landmark::new(400.0, 400.0))
            .with(LandmarkName::LeftHip, Landmark::new(560.0, 900.0))
            .with(LandmarkName::RightHip, Landmark::new(440.0, 900.0))
            .with(LandmarkName::LeftAnkle, Landmark::new(500.0, 1900.0))
            .with(LandmarkName::RightAnkle, Landmark::new(500.0, 1900.0))
    }

    fn detection(set: LandmarkSet) -> PoseDetection {
        PoseDetection::single(DetectedPose::new(set))
    }

    #[test]
    fn empty_detection_is_no_pose() {
        let outcome = MeasurementExtractor::new()
            .extract(&PoseDetection::empty(), 1000, 2000, Some(180.0))
            .unwrap();
        assert!(outcome.is_no_pose());
        assert!(outcome.profile().is_none());
    }

    #[test]
    fn measures_standing_pose_with_reference_height() {
        // Body height 1700 px at 170 cm → 0.1 cm/px; shoulders 200 px → 20 cm.
        let profile = MeasurementExtractor::new()
            .extract(&detection(standing_pose()), 1000, 2000, Some(170.0))
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(profile.height(), 170.0);
        assert_eq!(profile.shoulder(), 20.0);
        assert_eq!(profile.chest(), 43.0);
        assert_eq!(profile.waist(), 38.0);
        // Torso 500 px over 1700 px body height.
        assert_eq!(profile.torso_ratio(), 0.29);
        assert_eq!(profile.confidence(), Some(Confidence::FULL));
        assert_eq!(profile.source(), MeasurementSource::PhotoExtraction);
    }

    #[test]
    fn reference_height_scales_measurements() {
        let profile = MeasurementExtractor::new()
            .extract(&detection(standing_pose()), 1000, 2000, Some(340.0))
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(profile.height(), 340.0);
        assert_eq!(profile.shoulder(), 40.0);
        assert_eq!(profile.chest(), 86.0);
        assert_eq!(profile.waist(), 76.0);
    }

    #[test]
    fn implausible_reference_height_falls_back_to_default() {
        assert_eq!(resolve_reference_height(None), DEFAULT_REFERENCE_HEIGHT_CM);
        assert_eq!(resolve_reference_height(Some(50.0)), DEFAULT_REFERENCE_HEIGHT_CM);
        assert_eq!(resolve_reference_height(Some(-10.0)), DEFAULT_REFERENCE_HEIGHT_CM);
        assert_eq!(resolve_reference_height(Some(f64::NAN)), DEFAULT_REFERENCE_HEIGHT_CM);
        assert_eq!(resolve_reference_height(Some(50.5)), 50.5);
        assert_eq!(resolve_reference_height(Some(182.0)), 182.0);
    }

    #[test]
    fn normalized_landmarks_are_scaled_before_measuring() {
        let normalized = LandmarkSet::new(CoordinateSpace::Normalized)
            .with(LandmarkName::Nose, Landmark::new(0.5, 0.1))
            .with(LandmarkName::LeftShoulder, Landmark::new(0.6, 0.2))
            .with(LandmarkName::RightShoulder, Landmark::new(0.4, 0.2))
            .with(LandmarkName::LeftHip, Landmark::new(0.56, 0.45))
            .with(LandmarkName::RightHip, Landmark::new(0.44, 0.45))
            .with(LandmarkName::LeftAnkle, Landmark::new(0.5, 0.95))
            .with(LandmarkName::RightAnkle, Landmark::new(0.5, 0.95));
        assert_eq!(normalized.len(), 7);

        let from_normalized = MeasurementExtractor::new()
            .extract(&detection(normalized), 1000, 2000, Some(170.0))
            .unwrap()
            .into_profile()
            .unwrap();
        let from_pixels = MeasurementExtractor::new()
            .extract(&detection(standing_pose()), 1000, 2000, Some(170.0))
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(from_normalized.shoulder(), from_pixels.shoulder());
        assert_eq!(from_normalized.chest(), from_pixels.chest());
        assert_eq!(from_normalized.torso_ratio(), from_pixels.torso_ratio());
    }

    #[test]
    fn doubling_resolution_leaves_measurements_unchanged() {
        let base = MeasurementExtractor::new()
            .extract(&detection(standing_pose()), 1000, 2000, Some(176.0))
            .unwrap()
            .into_profile()
            .unwrap();
        let doubled = MeasurementExtractor::new()
            .extract(&detection(standing_pose().rescaled(2.0)), 2000, 4000, Some(176.0))
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(base, doubled);
    }

    #[test]
    fn provider_confidence_is_reported_even_when_low() {
        let pose = DetectedPose::new(standing_pose()).with_confidence(Confidence::new(0.35));
        let profile = MeasurementExtractor::new()
            .extract(&PoseDetection::single(pose), 1000, 2000, None)
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(profile.confidence(), Some(Confidence::new(0.35)));
    }

    #[test]
    fn missing_landmarks_are_reported() {
        let set = LandmarkSet::new(CoordinateSpace::Pixel)
            .with(LandmarkName::Nose, Landmark::new(500.0, 200.0));
        let err = MeasurementExtractor::new()
            .extract(&detection(set), 1000, 2000, None)
            .unwrap_err();

        match err {
            ExtractionError::MissingLandmarks(names) => {
                assert_eq!(names.len(), 6);
                assert_eq!(names[0], LandmarkName::LeftShoulder);
            }
            other => panic!("Expected MissingLandmarks, got {:?}", other),
        }
    }

    #[test]
    fn collapsed_pose_is_degenerate() {
        let point = Landmark::new(10.0, 10.0);
        let set = LandmarkName::REQUIRED
            .iter()
            .fold(LandmarkSet::new(CoordinateSpace::Pixel), |set, name| set.with(*name, point));

        let err = MeasurementExtractor::new()
            .extract(&detection(set), 100, 100, None)
            .unwrap_err();
        assert_eq!(err, ExtractionError::DegenerateBodyHeight);
    }

    #[test]
    fn zero_image_size_is_rejected() {
        let err = MeasurementExtractor::new()
            .extract(&detection(standing_pose()), 0, 2000, None)
            .unwrap_err();
        assert_eq!(err, ExtractionError::InvalidImageSize { width: 0, height: 2000 });
    }

    #[test]
    fn custom_estimator_is_used() {
        use crate::domain::measurement::estimator::ShoulderRatioEstimator;

        let extractor =
            MeasurementExtractor::with_estimator(Arc::new(ShoulderRatioEstimator::new(3.0, 2.0)));
        let profile = extractor
            .extract(&detection(standing_pose()), 1000, 2000, Some(170.0))
            .unwrap()
            .into_profile()
            .unwrap();

        assert_eq!(profile.chest(), 60.0);
        assert_eq!(profile.waist(), 40.0);
    }

    #[test]
    fn extraction_error_maps_to_domain_error() {
        let err: DomainError =
            ExtractionError::MissingLandmarks(vec![LandmarkName::LeftAnkle]).into();
        assert_eq!(err.code, ErrorCode::LandmarksIncomplete);
        assert!(err.message.contains("left_ankle"));
    }
}
