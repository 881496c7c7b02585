//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

mod detection_sequencer;
mod measure_from_photo;
mod pose_session;
mod recommend_size;

pub use detection_sequencer::{DetectionSequencer, SubjectSequencers, DEFAULT_SUBJECT};
pub use measure_from_photo::{
    MeasureFromPhotoCommand, MeasureFromPhotoError, MeasureFromPhotoHandler,
    MeasureFromPhotoResult, MeasurementOutcome, MeasurementSettings,
};
pub use pose_session::PoseSession;
pub use recommend_size::{
    RecommendSizeCommand, RecommendSizeError, RecommendSizeHandler, RecommendSizeResult,
    RecommendationSettings,
};
