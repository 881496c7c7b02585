//! MeasureFromPhotoHandler - Photo to body measurement profile.
//!
//! Runs detection through the pose session, drops results superseded by a
//! newer request, and calibrates the surviving landmarks into centimeters.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DetectionToken, DomainError, ErrorCode, ValidationError};
use crate::domain::measurement::{
    BodyMeasurementProfile, ExtractionError, ExtractionOutcome, MeasurementExtractor, Reliability,
    MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM,
};
use crate::ports::{DetectionError, ImageInput};

use super::detection_sequencer::{SubjectSequencers, DEFAULT_SUBJECT};
use super::pose_session::PoseSession;

/// Command to measure a body from a photo.
#[derive(Debug, Clone)]
pub struct MeasureFromPhotoCommand {
    /// The photo to analyze.
    pub image: ImageInput,
    /// The subject's known height, used for calibration.
    pub reference_height_cm: Option<f64>,
    /// Who the photo shows. A newer photo of the same subject supersedes an
    /// older one still in flight; other subjects are unaffected.
    pub subject: Option<String>,
}

/// Measurement tuning taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSettings {
    /// Confidence below which a profile is flagged.
    pub min_confidence: f64,
    /// Reference height when the command has no plausible one.
    pub default_reference_height_cm: f64,
}

/// What a measurement request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MeasurementOutcome {
    /// A profile was extracted.
    Measured {
        profile: BodyMeasurementProfile,
        reliability: Reliability,
        /// Measurements outside typical adult ranges.
        warnings: Vec<ValidationError>,
    },
    /// The photo contained no detectable person.
    NoPoseDetected,
    /// A newer request was issued while this one ran; the result was dropped.
    Superseded,
}

impl MeasurementOutcome {
    /// The extracted profile, if any.
    pub fn profile(&self) -> Option<&BodyMeasurementProfile> {
        match self {
            MeasurementOutcome::Measured { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

/// Result of a measurement request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureFromPhotoResult {
    /// Token the request ran under.
    pub token: DetectionToken,
    #[serde(flatten)]
    pub outcome: MeasurementOutcome,
}

/// Error type for measuring from a photo.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureFromPhotoError {
    /// The landmark provider failed or timed out.
    Detection(DetectionError),
    /// A pose was found but could not be measured.
    Extraction(ExtractionError),
}

impl std::fmt::Display for MeasureFromPhotoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureFromPhotoError::Detection(err) => write!(f, "Detection failed: {}", err),
            MeasureFromPhotoError::Extraction(err) => write!(f, "Measurement failed: {}", err),
        }
    }
}

impl std::error::Error for MeasureFromPhotoError {}

impl From<DetectionError> for MeasureFromPhotoError {
    fn from(err: DetectionError) -> Self {
        MeasureFromPhotoError::Detection(err)
    }
}

impl From<ExtractionError> for MeasureFromPhotoError {
    fn from(err: ExtractionError) -> Self {
        MeasureFromPhotoError::Extraction(err)
    }
}

impl From<MeasureFromPhotoError> for DomainError {
    fn from(err: MeasureFromPhotoError) -> Self {
        match err {
            MeasureFromPhotoError::Detection(detection) => {
                let code = match &detection {
                    DetectionError::Timeout { .. } => ErrorCode::DetectionTimedOut,
                    DetectionError::ModelUnavailable { .. } | DetectionError::Closed => {
                        ErrorCode::ModelUnavailable
                    }
                    DetectionError::InvalidImage(_) | DetectionError::Failed(_) => {
                        ErrorCode::DetectionFailed
                    }
                };
                DomainError::new(code, detection.to_string())
                    .with_detail("retryable", detection.is_retryable().to_string())
            }
            MeasureFromPhotoError::Extraction(extraction) => extraction.into(),
        }
    }
}

/// Handler for photo measurement requests.
pub struct MeasureFromPhotoHandler {
    session: Arc<PoseSession>,
    sequencers: Arc<SubjectSequencers>,
    extractor: MeasurementExtractor,
    settings: MeasurementSettings,
}

impl MeasureFromPhotoHandler {
    pub fn new(
        session: Arc<PoseSession>,
        sequencers: Arc<SubjectSequencers>,
        extractor: MeasurementExtractor,
        settings: MeasurementSettings,
    ) -> Self {
        Self {
            session,
            sequencers,
            extractor,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: MeasureFromPhotoCommand,
    ) -> Result<MeasureFromPhotoResult, MeasureFromPhotoError> {
        // 1. Take a token in the subject's lane before detection starts
        let subject = cmd.subject.as_deref().unwrap_or(DEFAULT_SUBJECT);
        let sequencer = self.sequencers.for_subject(subject).await;
        let token = sequencer.next_token();
        debug!(%token, subject, image = %cmd.image.source, "Starting landmark detection");

        // 2. Detect under the session deadline
        let detection = self.session.detect(&cmd.image).await;

        // 3. Drop the result if a newer request was issued meanwhile
        if !sequencer.accept(token) {
            info!(%token, subject, "Discarding superseded detection result");
            return Ok(MeasureFromPhotoResult {
                token,
                outcome: MeasurementOutcome::Superseded,
            });
        }
        let detection = detection?;

        // 4. Calibrate and measure
        let reference = self.reference_height(cmd.reference_height_cm);
        let outcome = match self.extractor.extract(
            &detection,
            cmd.image.width,
            cmd.image.height,
            Some(reference),
        )? {
            ExtractionOutcome::NoPoseDetected => {
                info!(%token, "No pose detected");
                MeasurementOutcome::NoPoseDetected
            }
            ExtractionOutcome::Measured(profile) => {
                let reliability = profile.reliability(self.settings.min_confidence);
                if reliability == Reliability::LowConfidence {
                    warn!(
                        %token,
                        confidence = %profile.effective_confidence(),
                        min_confidence = self.settings.min_confidence,
                        "Low-confidence detection"
                    );
                }
                let warnings = profile.plausibility_issues();
                info!(
                    %token,
                    height = profile.height(),
                    chest = profile.chest(),
                    waist = profile.waist(),
                    shoulder = profile.shoulder(),
                    estimator = self.extractor.estimator().name(),
                    "Body measured"
                );
                MeasurementOutcome::Measured {
                    profile,
                    reliability,
                    warnings,
                }
            }
        };

        Ok(MeasureFromPhotoResult { token, outcome })
    }

    fn reference_height(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(h) if h.is_finite() && h > MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM => h,
            _ => self.settings.default_reference_height_cm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockLandmarkProvider, MockPoseModelLoader};
    use crate::adapters::pose::MockError;
    use crate::domain::foundation::Confidence;
    use crate::domain::measurement::{
        CoordinateSpace, DetectedPose, Landmark, LandmarkName, LandmarkSet, PoseDetection,
    };
    use std::time::Duration;

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

    fn settings() -> MeasurementSettings {
        MeasurementSettings {
            min_confidence: 0.6,
            default_reference_height_cm: 170.0,
        }
    }

    fn handler(provider: MockLandmarkProvider) -> MeasureFromPhotoHandler {
        let loader = Arc::new(MockPoseModelLoader::new(provider));
        MeasureFromPhotoHandler::new(
            Arc::new(PoseSession::new(loader, Duration::from_millis(200))),
            Arc::new(SubjectSequencers::new()),
            MeasurementExtractor::new(),
            settings(),
        )
    }

    fn command(reference: Option<f64>) -> MeasureFromPhotoCommand {
        MeasureFromPhotoCommand {
            image: ImageInput::new("photo.jpg", 1000, 2000),
            reference_height_cm: reference,
            subject: None,
        }
    }

    fn photo_of(subject: &str, image: &str) -> MeasureFromPhotoCommand {
        MeasureFromPhotoCommand {
            image: ImageInput::new(image, 1000, 2000),
            reference_height_cm: None,
            subject: Some(subject.to_string()),
        }
    }

    #[tokio::test]
    async fn measures_detected_pose() {
        let provider = MockLandmarkProvider::new()
            .with_detection(PoseDetection::single(DetectedPose::new(standing_pose())));

        let result = handler(provider).handle(command(None)).await.unwrap();

        assert_eq!(result.token.value(), 1);
        let profile = result.outcome.profile().unwrap();
        assert_eq!(profile.height(), 170.0);
        assert_eq!(profile.shoulder(), 20.0);
        assert_eq!(profile.chest(), 43.0);
        assert_eq!(profile.waist(), 38.0);
    }

    #[tokio::test]
    async fn implausible_reference_falls_back_to_configured_default() {
        let provider = MockLandmarkProvider::new()
            .with_detection(PoseDetection::single(DetectedPose::new(standing_pose())));
        let mut handler = handler(provider);
        handler.settings.default_reference_height_cm = 180.0;

        let result = handler.handle(command(Some(30.0))).await.unwrap();
        assert_eq!(result.outcome.profile().unwrap().height(), 180.0);
    }

    #[tokio::test]
    async fn flags_low_confidence_and_implausible_values() {
        let pose = DetectedPose::new(standing_pose()).with_confidence(Confidence::new(0.4));
        let provider = MockLandmarkProvider::new().with_detection(PoseDetection::single(pose));

        let result = handler(provider).handle(command(None)).await.unwrap();

        match result.outcome {
            MeasurementOutcome::Measured {
                reliability,
                warnings,
                ..
            } => {
                assert_eq!(reliability, Reliability::LowConfidence);
                assert!(!warnings.is_empty());
            }
            other => panic!("expected a measurement, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_detection_is_no_pose() {
        let result = handler(MockLandmarkProvider::new())
            .handle(command(None))
            .await
            .unwrap();
        assert_eq!(result.outcome, MeasurementOutcome::NoPoseDetected);
    }

    #[tokio::test]
    async fn provider_error_maps_to_detection_error() {
        let provider = MockLandmarkProvider::new().with_error(MockError::Failed {
            message: "inference crashed".to_string(),
        });

        let err = handler(provider).handle(command(None)).await.unwrap_err();
        assert_eq!(
            err,
            MeasureFromPhotoError::Detection(DetectionError::failed("inference crashed"))
        );
        assert_eq!(DomainError::from(err).code, ErrorCode::DetectionFailed);
    }

    #[tokio::test]
    async fn timeout_is_an_extraction_failure() {
        let provider = MockLandmarkProvider::new().with_delay(Duration::from_secs(5));

        let err = handler(provider).handle(command(None)).await.unwrap_err();
        let domain = DomainError::from(err);
        assert_eq!(domain.code, ErrorCode::DetectionTimedOut);
        assert_eq!(domain.details.get("retryable").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn missing_landmarks_map_to_extraction_error() {
        let partial = LandmarkSet::new(CoordinateSpace::Pixel)
            .with(LandmarkName::Nose, Landmark::new(500.0, 200.0));
        let provider = MockLandmarkProvider::new()
            .with_detection(PoseDetection::single(DetectedPose::new(partial)));

        let err = handler(provider).handle(command(None)).await.unwrap_err();
        assert!(matches!(
            err,
            MeasureFromPhotoError::Extraction(ExtractionError::MissingLandmarks(_))
        ));
    }

    #[tokio::test]
    async fn superseded_request_is_discarded() {
        let detection = PoseDetection::single(DetectedPose::new(standing_pose()));
        let provider = MockLandmarkProvider::new()
            .with_delayed_detection(Duration::from_millis(100), detection.clone())
            .with_detection(detection);
        let handler = Arc::new(handler(provider));

        let slow = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.handle(command(None)).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = handler.handle(command(None)).await.unwrap();
        let slow = slow.await.unwrap().unwrap();

        assert_eq!(fast.token.value(), 2);
        assert!(fast.outcome.profile().is_some());
        assert_eq!(slow.token.value(), 1);
        assert_eq!(slow.outcome, MeasurementOutcome::Superseded);
    }

    #[tokio::test]
    async fn different_subjects_do_not_supersede_each_other() {
        let detection = PoseDetection::single(DetectedPose::new(standing_pose()));
        let provider = MockLandmarkProvider::new()
            .with_delayed_detection(Duration::from_millis(100), detection.clone())
            .with_detection(detection);
        let handler = Arc::new(handler(provider));

        let alice = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.handle(photo_of("alice", "alice.jpg")).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let bob = handler.handle(photo_of("bob", "bob.jpg")).await.unwrap();
        let alice = alice.await.unwrap().unwrap();

        assert!(bob.outcome.profile().is_some());
        assert!(alice.outcome.profile().is_some());
        assert_eq!(alice.token.value(), 1);
        assert_eq!(bob.token.value(), 1);
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let result = MeasureFromPhotoResult {
            token: DetectionToken::from_raw(3),
            outcome: MeasurementOutcome::NoPoseDetected,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "no_pose_detected");
        assert_eq!(json["token"], 3);
    }
}
