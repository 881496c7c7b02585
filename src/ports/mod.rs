//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LandmarkProvider` - Pose detection on a photograph
//! - `PoseModelLoader` - One-time loading of the pose model
//! - `SizeChartSource` - Garment size charts

mod landmark_provider;
mod size_chart_source;

pub use landmark_provider::{
    DetectionError, ImageInput, LandmarkProvider, PoseModelLoader, ProviderInfo,
};
pub use size_chart_source::{ChartSourceError, SizeChartSource};
