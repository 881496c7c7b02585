//! Pose adapters - Implementations of the LandmarkProvider port.
//!
//! - `MockLandmarkProvider` / `MockPoseModelLoader` - Configurable test doubles
//! - `FileLandmarkProvider` - Landmarks recorded as JSON documents

mod file_provider;
mod mock_provider;

pub use file_provider::{
    FileLandmarkProvider, LandmarkDocument, RecordedImage, RecordedLandmark, RecordedPose,
};
pub use mock_provider::{MockError, MockLandmarkProvider, MockPoseModelLoader, MockResponse};
