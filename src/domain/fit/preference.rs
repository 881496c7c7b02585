//! Fit preference and ease targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How loosely the wearer wants the garment to sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPreference {
    Slim,
    #[default]
    Regular,
    Relaxed,
}

impl FitPreference {
    /// Returns the lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FitPreference::Slim => "slim",
            FitPreference::Regular => "regular",
            FitPreference::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for FitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FitPreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slim" => Ok(FitPreference::Slim),
            "regular" => Ok(FitPreference::Regular),
            "relaxed" => Ok(FitPreference::Relaxed),
            other => Err(ValidationError::invalid_format(
                "fit_preference",
                format!("expected slim, regular or relaxed, got '{}'", other),
            )),
        }
    }
}

/// Intended looseness per zone (garment minus body, cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaseTarget {
    pub chest: f64,
    pub shoulder: f64,
    pub waist: f64,
}

impl EaseTarget {
    pub const fn new(chest: f64, shoulder: f64, waist: f64) -> Self {
        Self {
            chest,
            shoulder,
            waist,
        }
    }
}

/// Ease targets for every preference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EaseTable {
    pub slim: EaseTarget,
    pub regular: EaseTarget,
    pub relaxed: EaseTarget,
}

impl EaseTable {
    /// Standard menswear ease allowances.
    pub const STANDARD: EaseTable = EaseTable {
        slim: EaseTarget::new(3.0, 1.0, 4.0),
        regular: EaseTarget::new(5.0, 2.0, 6.0),
        relaxed: EaseTarget::new(8.0, 3.0, 10.0),
    };

    /// Returns the target for a preference.
    pub fn target(&self, preference: FitPreference) -> &EaseTarget {
        match preference {
            FitPreference::Slim => &self.slim,
            FitPreference::Regular => &self.regular,
            FitPreference::Relaxed => &self.relaxed,
        }
    }
}

impl Default for EaseTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
