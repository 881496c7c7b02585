//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the fit domain.

mod confidence;
mod errors;
mod ids;
mod percentage;
mod timestamp;

pub use confidence::Confidence;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClothingItemId, DetectionToken, FitResultId, UserId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
