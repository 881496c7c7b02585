//! Measurement Module - From pose landmarks to body measurements.
//!
//! # Components
//!
//! - `LandmarkSet` / `PoseDetection` - Provider output in image space
//! - `MeasurementExtractor` - Calibrated pixel → centimeter conversion
//! - `BodyShapeEstimator` - Replaceable chest/waist girth estimation
//! - `BodyMeasurementProfile` - Immutable measurement value object

mod estimator;
mod extractor;
mod landmarks;
mod profile;
pub mod units;

pub use estimator::{BodyShapeEstimator, GirthEstimate, ShoulderRatioEstimator};
pub use extractor::{
    calibration_scale, resolve_reference_height, ExtractionError, ExtractionOutcome,
    MeasurementExtractor, DEFAULT_REFERENCE_HEIGHT_CM, MIN_PLAUSIBLE_REFERENCE_HEIGHT_CM,
};
pub use landmarks::{
    CoordinateSpace, DetectedPose, Landmark, LandmarkName, LandmarkSet, PoseDetection,
};
pub use profile::{
    BodyMeasurementProfile, MeasurementSource, Reliability, LOW_CONFIDENCE_THRESHOLD,
    PLAUSIBLE_RANGES,
};
