//! Confidence value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A real number between 0.0 and 1.0 inclusive.
///
/// Used both for a landmark provider's self-reported detection reliability
/// and for the share of well-fitting zones of a recommended size.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence.
    pub const FULL: Self = Self(1.0);

    /// Creates a Confidence, clamping to the valid range. NaN maps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Ratio of `part` to `whole`; zero when `whole` is zero.
    pub fn ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        Self::new(part as f64 / whole as f64)
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns true if the value is strictly below `threshold`.
    pub fn is_below(&self, threshold: f64) -> bool {
        self.0 < threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_new_clamps() {
        assert_eq!(Confidence::new(1.7), Confidence::FULL);
        assert_eq!(Confidence::new(-0.2), Confidence::ZERO);
        assert_eq!(Confidence::new(f64::NAN), Confidence::ZERO);
        assert_eq!(Confidence::new(0.42).value(), 0.42);
    }

    #[test]
    fn confidence_try_new_rejects_out_of_range() {
        assert!(Confidence::try_new(1.01).is_err());
        assert!(Confidence::try_new(-0.01).is_err());
        assert!(Confidence::try_new(f64::NAN).is_err());
        assert!(Confidence::try_new(0.6).is_ok());
    }

    #[test]
    fn confidence_ratio_handles_empty_whole() {
        assert_eq!(Confidence::ratio(0, 0), Confidence::ZERO);
        assert_eq!(Confidence::ratio(3, 4).value(), 0.75);
        assert_eq!(Confidence::ratio(3, 3), Confidence::FULL);
    }

    #[test]
    fn confidence_threshold_check() {
        assert!(Confidence::new(0.59).is_below(0.6));
        assert!(!Confidence::new(0.6).is_below(0.6));
    }

    #[test]
    fn confidence_displays_two_decimals() {
        assert_eq!(Confidence::new(2.0 / 3.0).to_string(), "0.67");
    }
}
