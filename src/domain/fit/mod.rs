//! Fit Module - Size chart comparison and recommendation.
//!
//! # Components
//!
//! - `FitZoneCalculator` - Per-area tight/good/loose comparison
//! - `FitScorer` - Ease-deviation score (0-100)
//! - `RecommendationSelector` - Bands, explanations, best size
//! - `ConfidenceEstimator` - Share of good zones
//! - `quick_pick_size` - Nearest size by weighted raw difference
//! - `FitResult` - Recommendation record for a user and item

mod confidence;
mod fit_result;
mod preference;
mod quick_pick;
mod recommendation;
mod scorer;
mod size_chart;
mod zone;

pub use confidence::ConfidenceEstimator;
pub use fit_result::FitResult;
pub use preference::{EaseTable, EaseTarget, FitPreference};
pub use quick_pick::{quick_pick_size, size_distance};
pub use recommendation::{
    RecommendationSelector, RecommendationType, SelectorSettings, SizeFitAnalysis,
    ACCEPTABLE_THRESHOLD, GOOD_THRESHOLD, PERFECT_THRESHOLD,
};
pub use scorer::{FitScorer, PenaltyWeights};
pub use size_chart::{ChartIntake, ChartUnit, ExcludedEntry, RawSizeChartEntry, SizeChartEntry};
pub use zone::{FitArea, FitStatus, FitZone, FitZoneCalculator, ZoneBand, ZoneBands};
