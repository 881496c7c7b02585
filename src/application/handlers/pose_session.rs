//! PoseSession - Owns the loaded pose model for its whole lifetime.
//!
//! The model is loaded on first use, shared by every detection after that,
//! and closed only when `release` is called.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::measurement::PoseDetection;
use crate::ports::{DetectionError, ImageInput, LandmarkProvider, PoseModelLoader};

/// Lazily loaded, explicitly released pose model.
pub struct PoseSession {
    loader: Arc<dyn PoseModelLoader>,
    detection_timeout: Duration,
    provider: Mutex<Option<Arc<dyn LandmarkProvider>>>,
}

impl PoseSession {
    pub fn new(loader: Arc<dyn PoseModelLoader>, detection_timeout: Duration) -> Self {
        Self {
            loader,
            detection_timeout,
            provider: Mutex::new(None),
        }
    }

    /// Returns the loaded provider, loading the model on first call.
    ///
    /// Concurrent first calls share a single load.
    pub async fn acquire(&self) -> Result<Arc<dyn LandmarkProvider>, DetectionError> {
        let mut slot = self.provider.lock().await;
        if let Some(provider) = slot.as_ref() {
            return Ok(Arc::clone(provider));
        }

        let provider = self.loader.load().await?;
        let info = provider.provider_info();
        info!(provider = %info.name, model = %info.model, "Pose model loaded");
        *slot = Some(Arc::clone(&provider));
        Ok(provider)
    }

    /// Runs one detection under the configured deadline.
    ///
    /// An overrun yields `DetectionError::Timeout`; the model stays loaded.
    pub async fn detect(&self, image: &ImageInput) -> Result<PoseDetection, DetectionError> {
        if !image.has_area() {
            return Err(DetectionError::invalid_image(format!(
                "{} has no area ({}x{})",
                image.source, image.width, image.height
            )));
        }

        let provider = self.acquire().await?;
        match tokio::time::timeout(self.detection_timeout, provider.detect(image)).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.detection_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(image = %image.source, timeout_ms, "Landmark detection timed out");
                Err(DetectionError::timeout(timeout_ms))
            }
        }
    }

    /// Closes the loaded model, if any. A later `acquire` loads it again.
    ///
    /// If closing fails the model stays in the session, so `release` can be
    /// retried and detections keep working.
    pub async fn release(&self) -> Result<(), DetectionError> {
        let mut slot = self.provider.lock().await;
        let Some(provider) = slot.take() else {
            debug!("Pose session released without a loaded model");
            return Ok(());
        };

        if let Err(err) = provider.close().await {
            warn!(provider = %provider.provider_info().name, error = %err, "Failed to release pose model");
            *slot = Some(provider);
            return Err(err);
        }
        info!(provider = %provider.provider_info().name, "Pose model released");
        Ok(())
    }

    /// Returns true while a model is loaded.
    pub async fn is_loaded(&self) -> bool {
        self.provider.lock().await.is_some()
    }

    pub fn detection_timeout(&self) -> Duration {
        self.detection_timeout
    }
}
