//! Landmark Provider Port - Interface for pose-estimation backends.
//!
//! This port abstracts the model that turns a photograph into named body
//! landmarks, so the measurement pipeline never couples to a specific
//! pose-estimation runtime.
//!
//! # Design
//!
//! - Models are loaded once through a [`PoseModelLoader`] and reused
//! - Detection is async and may be slow; callers bound it with a timeout
//! - Zero detected poses is a successful, empty [`PoseDetection`]
//! - `close` releases model resources explicitly
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedProvider(PoseDetection);
//!
//! #[async_trait]
//! impl LandmarkProvider for FixedProvider {
//!     async fn detect(&self, _image: &ImageInput) -> Result<PoseDetection, DetectionError> {
//!         Ok(self.0.clone())
//!     }
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("fixed", "none")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::measurement::PoseDetection;

/// Port for pose landmark detection.
#[async_trait]
pub trait LandmarkProvider: Send + Sync {
    /// Detects poses in an image.
    ///
    /// Returns an empty detection when no person is found.
    async fn detect(&self, image: &ImageInput) -> Result<PoseDetection, DetectionError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;

    /// Releases model resources. Detection after close fails with `Closed`.
    async fn close(&self) -> Result<(), DetectionError> {
        Ok(())
    }
}

/// Port for loading a pose model into a ready provider.
#[async_trait]
pub trait PoseModelLoader: Send + Sync {
    /// Loads the model. Expensive; callers keep the result.
    async fn load(&self) -> Result<Arc<dyn LandmarkProvider>, DetectionError>;
}

/// An image handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    /// Provider-interpreted locator (file path, object key, ...).
    pub source: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageInput {
    /// Creates a new image input.
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }

    /// Returns true if both dimensions are non-zero.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "mediapipe", "file").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Landmark provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectionError {
    /// The model could not be loaded or is no longer available.
    #[error("pose model unavailable: {message}")]
    ModelUnavailable {
        /// Error details.
        message: String,
    },

    /// Detection did not finish within the deadline.
    #[error("detection timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The image could not be read or has no area.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Detection ran but failed.
    #[error("detection failed: {0}")]
    Failed(String),

    /// The provider has been closed.
    #[error("provider closed")]
    Closed,
}

impl DetectionError {
    /// Creates a model unavailable error.
    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates an invalid image error.
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage(message.into())
    }

    /// Creates a failed error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DetectionError::Timeout { .. } | DetectionError::ModelUnavailable { .. }
        )
    }
}
