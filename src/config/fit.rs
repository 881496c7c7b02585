//! Fit recommendation configuration

use serde::Deserialize;

use crate::domain::fit::FitPreference;

/// Fit recommendation configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FitConfig {
    /// Preference used when a request does not name one
    #[serde(default)]
    pub default_preference: FitPreference,

    /// Directory that relative size chart locations resolve against
    pub chart_dir: Option<String>,
}
