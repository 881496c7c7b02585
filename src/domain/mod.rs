//! Domain layer containing the measurement and fit logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `measurement` - Pose landmarks to calibrated body measurements
//! - `fit` - Pure size chart comparison, scoring, and recommendation

pub mod fit;
pub mod foundation;
pub mod measurement;
