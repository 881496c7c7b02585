//! File Landmark Provider - Landmarks recorded as JSON documents.
//!
//! Stands in for a live pose model when landmarks were produced elsewhere
//! (a browser-side model, a batch job, test fixtures). The image source is
//! the path of a landmark document:
//!
//! ```json
//! {
//!   "image": { "width": 1080, "height": 1920 },
//!   "space": "normalized",
//!   "poses": [
//!     {
//!       "confidence": 0.93,
//!       "landmarks": { "nose": { "x": 0.5, "y": 0.1, "z": -0.2, "visibility": 0.99 } }
//!     },
//!     { "keypoints": [ { "x": 0.5, "y": 0.1 } ] }
//!   ]
//! }
//! ```
//!
//! A pose lists either named `landmarks` or BlazePose index-ordered
//! `keypoints`.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::domain::foundation::Confidence;
use crate::domain::measurement::{
    CoordinateSpace, DetectedPose, Landmark, LandmarkName, LandmarkSet, PoseDetection,
};
use crate::ports::{DetectionError, ImageInput, LandmarkProvider, PoseModelLoader, ProviderInfo};

/// Image dimensions recorded alongside the landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecordedImage {
    pub width: u32,
    pub height: u32,
}

/// A landmark as written by pose runtimes, with optional visibility.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecordedLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl RecordedLandmark {
    fn to_landmark(self) -> Landmark {
        Landmark {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    fn is_visible(&self, min_visibility: Option<f64>) -> bool {
        match (min_visibility, self.visibility) {
            (Some(min), Some(visibility)) => visibility >= min,
            _ => true,
        }
    }
}

/// One recorded pose.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordedPose {
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub landmarks: BTreeMap<LandmarkName, RecordedLandmark>,
    #[serde(default)]
    pub keypoints: Vec<RecordedLandmark>,
}

/// A landmark document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandmarkDocument {
    #[serde(default)]
    pub image: Option<RecordedImage>,
    #[serde(default)]
    pub space: CoordinateSpace,
    #[serde(default)]
    pub poses: Vec<RecordedPose>,
}

impl LandmarkDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DetectionError> {
        serde_json::from_str(text)
            .map_err(|e| DetectionError::invalid_image(format!("malformed landmark document: {}", e)))
    }

    /// Reads and parses a document from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, DetectionError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            DetectionError::invalid_image(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Converts the document into a detection, dropping landmarks whose
    /// visibility is below `min_visibility`.
    pub fn to_detection(&self, min_visibility: Option<f64>) -> PoseDetection {
        let poses = self
            .poses
            .iter()
            .map(|pose| {
                let indexed = pose
                    .keypoints
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| k.is_visible(min_visibility))
                    .filter_map(|(i, k)| LandmarkName::from_pose_index(i).map(|name| (name, *k)));
                let named = pose
                    .landmarks
                    .iter()
                    .filter(|(_, l)| l.is_visible(min_visibility))
                    .map(|(name, l)| (*name, *l));

                let mut set = LandmarkSet::new(self.space);
                for (name, landmark) in indexed.chain(named) {
                    set = set.with(name, landmark.to_landmark());
                }
                let detected = DetectedPose::new(set);
                match pose.confidence {
                    Some(c) => detected.with_confidence(Confidence::new(c)),
                    None => detected,
                }
            })
            .collect();
        PoseDetection { poses }
    }
}

/// Landmark provider backed by landmark documents on disk.
#[derive(Debug, Clone, Default)]
pub struct FileLandmarkProvider {
    min_visibility: Option<f64>,
}

impl FileLandmarkProvider {
    /// Creates a provider that keeps every recorded landmark.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops landmarks whose recorded visibility is below `min`.
    pub fn with_min_visibility(mut self, min: f64) -> Self {
        self.min_visibility = Some(min);
        self
    }
}

#[async_trait]
impl LandmarkProvider for FileLandmarkProvider {
    async fn detect(&self, image: &ImageInput) -> Result<PoseDetection, DetectionError> {
        let document = LandmarkDocument::read(&image.source).await?;
        let detection = document.to_detection(self.min_visibility);
        debug!(
            source = %image.source,
            poses = detection.poses.len(),
            "Loaded recorded landmarks"
        );
        Ok(detection)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("file", "recorded-landmarks")
    }
}

/// Recorded landmarks need no model; loading hands out a copy of the provider.
#[async_trait]
impl PoseModelLoader for FileLandmarkProvider {
    async fn load(&self) -> Result<Arc<dyn LandmarkProvider>, DetectionError> {
        Ok(Arc::new(self.clone()))
    }
}
