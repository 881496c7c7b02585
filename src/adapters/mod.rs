//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `pose` - Landmark providers (recorded files, mocks)
//! - `chart` - Size chart sources (JSON/YAML files)

pub mod chart;
pub mod pose;

pub use chart::FileSizeChartSource;
pub use pose::{FileLandmarkProvider, MockLandmarkProvider, MockPoseModelLoader};
