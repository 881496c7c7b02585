//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Detection timeout must be between 1 and 120000 ms")]
    InvalidDetectionTimeout,

    #[error("Minimum confidence must be between 0 and 1")]
    InvalidMinConfidence,

    #[error("Minimum landmark visibility must be between 0 and 1")]
    InvalidMinVisibility,

    #[error("Default reference height must be above 50 cm")]
    InvalidReferenceHeight,

    #[error("Log level filter must not be empty")]
    EmptyLogLevel,
}
