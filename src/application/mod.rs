//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    DetectionSequencer, MeasureFromPhotoCommand, MeasureFromPhotoError, MeasureFromPhotoHandler,
    MeasureFromPhotoResult, MeasurementOutcome, MeasurementSettings, PoseSession,
    RecommendSizeCommand, RecommendSizeError, RecommendSizeHandler, RecommendSizeResult,
    RecommendationSettings, SubjectSequencers, DEFAULT_SUBJECT,
};
