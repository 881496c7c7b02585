//! Integration tests for the measure-then-recommend flow.
//!
//! These tests drive the public API end to end:
//! 1. A mock or recorded landmark provider supplies a pose
//! 2. MeasureFromPhotoHandler calibrates it into a body profile
//! 3. RecommendSizeHandler scores the profile against a chart file
//!
//! Chart and landmark documents are written to temporary directories.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use fit_advisor::adapters::pose::MockError;
use fit_advisor::adapters::{
    FileLandmarkProvider, FileSizeChartSource, MockLandmarkProvider, MockPoseModelLoader,
};
use fit_advisor::application::{
    MeasureFromPhotoCommand, MeasureFromPhotoHandler, MeasurementOutcome,
    MeasurementSettings, PoseSession, RecommendSizeCommand, RecommendSizeHandler,
    RecommendationSettings, SubjectSequencers,
};
use fit_advisor::domain::fit::{
    ConfidenceEstimator, FitArea, FitPreference, FitStatus, RecommendationSelector,
    RecommendationType, SizeChartEntry,
};
use fit_advisor::domain::foundation::{
    ClothingItemId, Confidence, DomainError, ErrorCode, UserId,
};
use fit_advisor::domain::measurement::{
    BodyMeasurementProfile, CoordinateSpace, DetectedPose, Landmark, LandmarkName, LandmarkSet,
    MeasurementExtractor, PoseDetection, Reliability,
};
use fit_advisor::ports::{DetectionError, ImageInput};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CHART_YAML: &str = r#"
unit: cm
entries:
  - { size: M, chest: 96, length: 72, shoulder: 44, waist: 86 }
  - { size: L, chest: 100, length: 74, shoulder: 46, waist: 90 }
  - { size: XL, chest: 106, length: 76, shoulder: 49, waist: 98 }
  - { size: XXL, length: 78, shoulder: 51 }
"#;

/// Pose of a 176 cm subject with 44 cm shoulders, in a 1000x2000 image.
fn subject_pose() -> LandmarkSet {
    LandmarkSet::new(CoordinateSpace::Pixel)
        .with(LandmarkName::Nose, Landmark::new(500.0, 200.0))
        .with(LandmarkName::LeftShoulder, Landmark::new(700.0, 400.0))
        .with(LandmarkName::RightShoulder, Landmark::new(300.0, 400.0))
        .with(LandmarkName::LeftHip, Landmark::new(580.0, 1100.0))
        .with(LandmarkName::RightHip, Landmark::new(420.0, 1100.0))
        .with(LandmarkName::LeftAnkle, Landmark::new(500.0, 1800.0))
        .with(LandmarkName::RightAnkle, Landmark::new(500.0, 1800.0))
}

fn measure_handler(provider: MockLandmarkProvider, timeout: Duration) -> MeasureFromPhotoHandler {
    let loader = Arc::new(MockPoseModelLoader::new(provider));
    MeasureFromPhotoHandler::new(
        Arc::new(PoseSession::new(loader, timeout)),
        Arc::new(SubjectSequencers::new()),
        MeasurementExtractor::new(),
        MeasurementSettings {
            min_confidence: 0.6,
            default_reference_height_cm: 170.0,
        },
    )
}

fn photo(reference_height_cm: Option<f64>) -> MeasureFromPhotoCommand {
    MeasureFromPhotoCommand {
        image: ImageInput::new("photo.jpg", 1000, 2000),
        reference_height_cm,
        subject: Some("user-42".to_string()),
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.display().to_string()
}

fn recommend_handler() -> RecommendSizeHandler {
    RecommendSizeHandler::new(
        Arc::new(FileSizeChartSource::new()),
        RecommendationSettings {
            default_preference: FitPreference::Regular,
            min_confidence: 0.6,
        },
    )
}

fn recommend_command(profile: BodyMeasurementProfile, chart: String) -> RecommendSizeCommand {
    RecommendSizeCommand {
        user_id: UserId::new("user-42").unwrap(),
        clothing_item_id: ClothingItemId::new("oxford-shirt").unwrap(),
        profile,
        chart_location: chart,
        preference: None,
    }
}

fn entry(size: &str, chest: f64, shoulder: f64, waist: Option<f64>) -> SizeChartEntry {
    SizeChartEntry::new(size, chest, 72.0, shoulder, waist).unwrap()
}

fn scenario_body() -> BodyMeasurementProfile {
    BodyMeasurementProfile::manual(178.0, 95.0, 80.0, 45.0).unwrap()
}

// =============================================================================
// Scoring Scenarios
// =============================================================================

#[test]
fn scenario_a_scores_acceptable() {
    let analyses = RecommendationSelector::analyze_all(
        &scenario_body(),
        &[entry("M", 96.0, 44.0, Some(86.0))],
        FitPreference::Regular,
    );

    let m = &analyses[0];
    assert_eq!(m.score.value(), 66);
    assert_eq!(m.recommendation_type, RecommendationType::Acceptable);
    let shoulder = m.fit_zones.iter().find(|z| z.area == FitArea::Shoulder).unwrap();
    assert_eq!(shoulder.status, FitStatus::Tight);
    assert_eq!(shoulder.difference, -1.0);
}

#[test]
fn scenario_b_is_perfect_with_full_confidence() {
    let analyses = RecommendationSelector::analyze_all(
        &scenario_body(),
        &[entry("L", 100.0, 47.0, Some(86.0))],
        FitPreference::Regular,
    );

    let l = &analyses[0];
    assert_eq!(l.score.value(), 100);
    assert_eq!(l.recommendation_type, RecommendationType::Perfect);
    assert!(l.fit_zones.iter().all(|z| z.status == FitStatus::Good));
    assert_eq!(ConfidenceEstimator::confidence(&l.fit_zones), Confidence::FULL);
}

#[tokio::test]
async fn scenario_c_entry_without_waist_has_three_zones() {
    let dir = TempDir::new().unwrap();
    let chart = write_file(
        &dir,
        "vest.json",
        r#"[{ "size": "M", "chest": 96, "length": 60, "shoulder": 50 }]"#,
    );

    let result = recommend_handler()
        .handle(recommend_command(scenario_body(), chart))
        .await
        .unwrap();

    let best = result.best.unwrap();
    let areas: Vec<FitArea> = best.fit_zones.iter().map(|z| z.area).collect();
    assert_eq!(areas, vec![FitArea::Chest, FitArea::Shoulder, FitArea::Length]);
    // Shoulder is loose (diff 5); chest and length are good: 2 of 3.
    assert_eq!(result.confidence, Confidence::ratio(2, 3));
}

#[tokio::test]
async fn chart_with_numeric_labels_and_a_bad_row_still_recommends() {
    let dir = TempDir::new().unwrap();
    let chart = write_file(
        &dir,
        "eu-shirt.yaml",
        r#"
- { size: 38, chest: 96, length: 72, shoulder: 44, waist: 86 }
- { size: 40, chest: n/a, length: 74, shoulder: 46 }
- { size: 42, chest: 100, length: 74, shoulder: 47, waist: 86 }
"#,
    );

    let result = recommend_handler()
        .handle(recommend_command(scenario_body(), chart))
        .await
        .unwrap();

    let sizes: Vec<&str> = result.analyses.iter().map(|a| a.size.as_str()).collect();
    assert_eq!(sizes, vec!["38", "42"]);
    assert_eq!(result.best.unwrap().size, "42");
    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].size.as_deref(), Some("40"));
}

// =============================================================================
// Photo To Recommendation
// =============================================================================

#[tokio::test]
async fn photo_measurement_feeds_recommendation() {
    let provider = MockLandmarkProvider::new().with_detection(PoseDetection::single(
        DetectedPose::new(subject_pose()).with_confidence(Confidence::new(0.9)),
    ));
    let measured = measure_handler(provider, Duration::from_secs(1))
        .handle(photo(Some(176.0)))
        .await
        .unwrap();

    let profile = measured.outcome.profile().unwrap().clone();
    assert_eq!(profile.height(), 176.0);
    assert_eq!(profile.shoulder(), 44.0);
    assert_eq!(profile.chest(), 95.0);
    assert_eq!(profile.waist(), 84.0);

    let dir = TempDir::new().unwrap();
    let chart = write_file(&dir, "shirt.yaml", CHART_YAML);
    let result = recommend_handler()
        .handle(recommend_command(profile, chart))
        .await
        .unwrap();

    let sizes: Vec<&str> = result.analyses.iter().map(|a| a.size.as_str()).collect();
    assert_eq!(sizes, vec!["M", "L", "XL"]);
    assert_eq!(result.analyses[0].score.value(), 60);
    assert_eq!(result.analyses[2].recommendation_type, RecommendationType::NotRecommended);

    let best = result.best.unwrap();
    assert_eq!(best.size, "L");
    assert_eq!(best.recommendation_type, RecommendationType::Perfect);
    assert_eq!(result.confidence, Confidence::FULL);
    assert_eq!(result.reliability, Reliability::Trusted);
    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].size.as_deref(), Some("XXL"));

    let record = result.fit_result.unwrap();
    assert_eq!(record.recommended_size, "L");
    assert_eq!(record.user_id.as_str(), "user-42");
}

#[tokio::test]
async fn recorded_landmarks_measure_like_live_ones() {
    let dir = TempDir::new().unwrap();
    let document = write_file(
        &dir,
        "photo.landmarks.json",
        r#"{
            "image": { "width": 1000, "height": 2000 },
            "space": "normalized",
            "poses": [{
                "confidence": 0.95,
                "landmarks": {
                    "nose": { "x": 0.5, "y": 0.1 },
                    "left_shoulder": { "x": 0.7, "y": 0.2 },
                    "right_shoulder": { "x": 0.3, "y": 0.2 },
                    "left_hip": { "x": 0.58, "y": 0.55 },
                    "right_hip": { "x": 0.42, "y": 0.55 },
                    "left_ankle": { "x": 0.5, "y": 0.9 },
                    "right_ankle": { "x": 0.5, "y": 0.9 }
                }
            }]
        }"#,
    );

    let handler = MeasureFromPhotoHandler::new(
        Arc::new(PoseSession::new(
            Arc::new(FileLandmarkProvider::new()),
            Duration::from_secs(1),
        )),
        Arc::new(SubjectSequencers::new()),
        MeasurementExtractor::new(),
        MeasurementSettings {
            min_confidence: 0.6,
            default_reference_height_cm: 170.0,
        },
    );
    let result = handler
        .handle(MeasureFromPhotoCommand {
            image: ImageInput::new(document, 1000, 2000),
            reference_height_cm: Some(176.0),
            subject: None,
        })
        .await
        .unwrap();

    let profile = result.outcome.profile().unwrap();
    assert_eq!(profile.shoulder(), 44.0);
    assert_eq!(profile.chest(), 95.0);
}

// =============================================================================
// Degraded Detection
// =============================================================================

#[tokio::test]
async fn photo_without_person_yields_no_pose() {
    let result = measure_handler(
        MockLandmarkProvider::new().with_detection(PoseDetection::empty()),
        Duration::from_secs(1),
    )
    .handle(photo(None))
    .await
    .unwrap();

    assert_eq!(result.outcome, MeasurementOutcome::NoPoseDetected);
}

#[tokio::test]
async fn low_confidence_profile_is_flagged_through_recommendation() {
    let provider = MockLandmarkProvider::new().with_detection(PoseDetection::single(
        DetectedPose::new(subject_pose()).with_confidence(Confidence::new(0.3)),
    ));
    let measured = measure_handler(provider, Duration::from_secs(1))
        .handle(photo(Some(176.0)))
        .await
        .unwrap();

    let profile = measured.outcome.profile().unwrap().clone();
    assert_eq!(profile.reliability(0.6), Reliability::LowConfidence);

    let dir = TempDir::new().unwrap();
    let chart = write_file(&dir, "shirt.yaml", CHART_YAML);
    let result = recommend_handler()
        .handle(recommend_command(profile, chart))
        .await
        .unwrap();
    assert_eq!(result.reliability, Reliability::LowConfidence);
    assert_eq!(result.best.unwrap().size, "L");
}

#[tokio::test]
async fn stale_detection_is_superseded_by_newer_request() {
    let slow = PoseDetection::single(DetectedPose::new(subject_pose()));
    let fast = PoseDetection::single(DetectedPose::new(subject_pose()));
    let provider = MockLandmarkProvider::new()
        .with_delayed_detection(Duration::from_millis(150), slow)
        .with_detection(fast);
    let handler = Arc::new(measure_handler(provider, Duration::from_secs(2)));

    let first = tokio::spawn({
        let handler = Arc::clone(&handler);
        async move { handler.handle(photo(Some(176.0))).await }
    });
    tokio::time::sleep(Duration::from_millis(30)).await;
    let second = handler.handle(photo(Some(176.0))).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert!(second.outcome.profile().is_some());
    assert_eq!(first.outcome, MeasurementOutcome::Superseded);
}

#[tokio::test]
async fn concurrent_photos_of_different_subjects_both_measure() {
    let detection = PoseDetection::single(DetectedPose::new(subject_pose()));
    let provider = MockLandmarkProvider::new()
        .with_delayed_detection(Duration::from_millis(100), detection.clone())
        .with_detection(detection);
    let handler = Arc::new(measure_handler(provider, Duration::from_secs(2)));
    let photo_of = |subject: &str| MeasureFromPhotoCommand {
        image: ImageInput::new(format!("{}.jpg", subject), 1000, 2000),
        reference_height_cm: Some(176.0),
        subject: Some(subject.to_string()),
    };

    let alice = tokio::spawn({
        let handler = Arc::clone(&handler);
        let cmd = photo_of("alice");
        async move { handler.handle(cmd).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let bob = handler.handle(photo_of("bob")).await.unwrap();
    let alice = alice.await.unwrap().unwrap();

    assert_eq!(bob.outcome.profile().unwrap().shoulder(), 44.0);
    assert_eq!(alice.outcome.profile().unwrap().shoulder(), 44.0);
}

#[tokio::test]
async fn slow_model_times_out_with_retryable_error() {
    let provider = MockLandmarkProvider::new().with_delay(Duration::from_secs(5));
    let err = measure_handler(provider, Duration::from_millis(50))
        .handle(photo(None))
        .await
        .unwrap_err();

    let domain = DomainError::from(err);
    assert_eq!(domain.code, ErrorCode::DetectionTimedOut);
    assert_eq!(domain.details.get("retryable").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn unavailable_model_surfaces_as_domain_error() {
    let loader = Arc::new(MockPoseModelLoader::failing("weights not downloaded"));
    let handler = MeasureFromPhotoHandler::new(
        Arc::new(PoseSession::new(loader, Duration::from_secs(1))),
        Arc::new(SubjectSequencers::new()),
        MeasurementExtractor::new(),
        MeasurementSettings {
            min_confidence: 0.6,
            default_reference_height_cm: 170.0,
        },
    );

    let err = handler.handle(photo(None)).await.unwrap_err();
    assert_eq!(DomainError::from(err).code, ErrorCode::ModelUnavailable);
}

#[tokio::test]
async fn provider_failure_is_not_retried() {
    let provider = MockLandmarkProvider::new().with_error(MockError::Failed {
        message: "tensor shape mismatch".to_string(),
    });
    let err = measure_handler(provider, Duration::from_secs(1))
        .handle(photo(None))
        .await
        .unwrap_err();

    let domain = DomainError::from(err);
    assert_eq!(domain.code, ErrorCode::DetectionFailed);
    assert!(!DetectionError::failed("tensor shape mismatch").is_retryable());
}
