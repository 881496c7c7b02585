//! Mock Landmark Provider for testing.
//!
//! Provides a configurable mock implementation of the LandmarkProvider port,
//! allowing tests to run without a real pose model.
//!
//! # Features
//!
//! - Pre-configured detections
//! - Simulated delays for timeout and ordering tests
//! - Error injection for resilience testing
//! - Call, load, and close tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockLandmarkProvider::new()
//!     .with_detection(PoseDetection::single(pose))
//!     .with_delay(Duration::from_millis(100));
//!
//! let detection = provider.detect(&image).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::measurement::PoseDetection;
use crate::ports::{DetectionError, ImageInput, LandmarkProvider, PoseModelLoader, ProviderInfo};

/// Mock landmark provider for testing.
///
/// Responses are consumed in order; once the queue is empty every call
/// returns an empty detection.
#[derive(Debug, Clone)]
pub struct MockLandmarkProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<ImageInput>>>,
    closed: Arc<AtomicBool>,
    close_error: Option<MockError>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a detection.
    Detection(PoseDetection),
    /// Return an error.
    Error(MockError),
    /// Wait before returning the detection, on top of the provider delay.
    Delayed(Duration, PoseDetection),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate an unloaded or crashed model.
    ModelUnavailable { message: String },
    /// Simulate an unreadable image.
    InvalidImage { message: String },
    /// Simulate an inference failure.
    Failed { message: String },
    /// Simulate a provider-side timeout.
    Timeout { timeout_ms: u64 },
}

impl From<MockError> for DetectionError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::ModelUnavailable { message } => DetectionError::model_unavailable(message),
            MockError::InvalidImage { message } => DetectionError::invalid_image(message),
            MockError::Failed { message } => DetectionError::failed(message),
            MockError::Timeout { timeout_ms } => DetectionError::timeout(timeout_ms),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockLandmarkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLandmarkProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-pose-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
            close_error: None,
        }
    }

    /// Adds a detection to the queue.
    pub fn with_detection(self, detection: PoseDetection) -> Self {
        self.push(MockResponse::Detection(detection))
    }

    /// Adds a detection that arrives after an extra delay.
    pub fn with_delayed_detection(self, delay: Duration, detection: PoseDetection) -> Self {
        self.push(MockResponse::Delayed(delay, detection))
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes `close` fail, leaving the provider open.
    pub fn with_close_error(mut self, error: MockError) -> Self {
        self.close_error = Some(error);
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ImageInput> {
        lock(&self.calls).clone()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn push(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Detection(PoseDetection::empty()))
    }
}

#[async_trait]
impl LandmarkProvider for MockLandmarkProvider {
    async fn detect(&self, image: &ImageInput) -> Result<PoseDetection, DetectionError> {
        if self.is_closed() {
            return Err(DetectionError::Closed);
        }

        lock(&self.calls).push(image.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Detection(detection) => Ok(detection),
            MockResponse::Delayed(extra, detection) => {
                sleep(extra).await;
                Ok(detection)
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }

    async fn close(&self) -> Result<(), DetectionError> {
        if let Some(err) = &self.close_error {
            return Err(err.clone().into());
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Mock model loader that hands out a shared mock provider.
#[derive(Debug, Clone)]
pub struct MockPoseModelLoader {
    provider: MockLandmarkProvider,
    load_count: Arc<AtomicUsize>,
    fail_with: Option<String>,
}

impl MockPoseModelLoader {
    /// Creates a loader that returns `provider` on every load.
    pub fn new(provider: MockLandmarkProvider) -> Self {
        Self {
            provider,
            load_count: Arc::new(AtomicUsize::new(0)),
            fail_with: None,
        }
    }

    /// Makes every load fail with `ModelUnavailable`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new(MockLandmarkProvider::new())
        }
    }

    /// Returns how many times the model was loaded.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Returns the provider handed out by this loader.
    pub fn provider(&self) -> &MockLandmarkProvider {
        &self.provider
    }
}

#[async_trait]
impl PoseModelLoader for MockPoseModelLoader {
    async fn load(&self) -> Result<Arc<dyn LandmarkProvider>, DetectionError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(DetectionError::model_unavailable(message.clone()));
        }
        Ok(Arc::new(self.provider.clone()))
    }
}
