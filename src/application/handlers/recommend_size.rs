//! RecommendSizeHandler - Body profile plus size chart to a recommendation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::fit::{
    quick_pick_size, ConfidenceEstimator, ExcludedEntry, FitPreference, FitResult,
    RecommendationSelector, SizeFitAnalysis,
};
use crate::domain::foundation::{ClothingItemId, Confidence, DomainError, ErrorCode, UserId};
use crate::domain::measurement::{BodyMeasurementProfile, Reliability};
use crate::ports::{ChartSourceError, SizeChartSource};

/// Command to recommend a size of one garment.
#[derive(Debug, Clone)]
pub struct RecommendSizeCommand {
    pub user_id: UserId,
    pub clothing_item_id: ClothingItemId,
    /// The wearer's measurements.
    pub profile: BodyMeasurementProfile,
    /// Where the garment's size chart lives.
    pub chart_location: String,
    /// Fit preference; the configured default when absent.
    pub preference: Option<FitPreference>,
}

/// Recommendation tuning taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSettings {
    pub default_preference: FitPreference,
    /// Profiles below this confidence are flagged in the result.
    pub min_confidence: f64,
}

/// Result of a recommendation request.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendSizeResult {
    /// The preference that was applied.
    pub preference: FitPreference,
    /// Every usable size, in chart order.
    pub analyses: Vec<SizeFitAnalysis>,
    /// Highest-scoring size; `None` for an empty chart.
    pub best: Option<SizeFitAnalysis>,
    /// Share of good zones for the best size; zero without one.
    pub confidence: Confidence,
    /// Nearest size by raw measurement distance.
    pub quick_pick: Option<String>,
    /// Recommendation record for the best size.
    pub fit_result: Option<FitResult>,
    /// Chart rows left out for missing or invalid values.
    pub excluded: Vec<ExcludedEntry>,
    /// How far the input profile can be trusted.
    pub reliability: Reliability,
}

/// Error type for recommending a size.
#[derive(Debug)]
pub enum RecommendSizeError {
    /// The size chart could not be loaded.
    Chart(ChartSourceError),
}

impl std::fmt::Display for RecommendSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendSizeError::Chart(err) => write!(f, "Size chart unavailable: {}", err),
        }
    }
}

impl std::error::Error for RecommendSizeError {}

impl From<ChartSourceError> for RecommendSizeError {
    fn from(err: ChartSourceError) -> Self {
        RecommendSizeError::Chart(err)
    }
}

impl From<RecommendSizeError> for DomainError {
    fn from(err: RecommendSizeError) -> Self {
        match err {
            RecommendSizeError::Chart(ChartSourceError::Malformed { .. })
            | RecommendSizeError::Chart(ChartSourceError::UnsupportedFormat(_)) => {
                DomainError::new(ErrorCode::InvalidFormat, err.to_string())
            }
            RecommendSizeError::Chart(ChartSourceError::Io { .. }) => {
                DomainError::new(ErrorCode::InternalError, err.to_string())
            }
        }
    }
}

/// Handler for size recommendation requests.
pub struct RecommendSizeHandler {
    chart_source: Arc<dyn SizeChartSource>,
    settings: RecommendationSettings,
}

impl RecommendSizeHandler {
    pub fn new(chart_source: Arc<dyn SizeChartSource>, settings: RecommendationSettings) -> Self {
        Self {
            chart_source,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecommendSizeCommand,
    ) -> Result<RecommendSizeResult, RecommendSizeError> {
        // 1. Load the chart; incomplete rows are already set aside
        let intake = self.chart_source.load_chart(&cmd.chart_location).await?;
        if intake.entries.is_empty() {
            warn!(chart = %cmd.chart_location, "Size chart has no usable entries");
        }

        // 2. Analyze every size
        let preference = cmd.preference.unwrap_or(self.settings.default_preference);
        let analyses = RecommendationSelector::analyze_all(&cmd.profile, &intake.entries, preference);
        for analysis in &analyses {
            debug!(
                size = %analysis.size,
                score = %analysis.score,
                band = %analysis.recommendation_type,
                "Size analyzed"
            );
        }

        // 3. Pick the best size and build the record
        let best = RecommendationSelector::best_size(&analyses).cloned();
        let confidence = best
            .as_ref()
            .map(|b| ConfidenceEstimator::confidence(&b.fit_zones))
            .unwrap_or(Confidence::ZERO);
        let quick_pick = quick_pick_size(&cmd.profile, &intake.entries).map(|e| e.size().to_string());
        let fit_result = FitResult::generate(cmd.user_id, cmd.clothing_item_id, &analyses);

        match &best {
            Some(best) => info!(
                size = %best.size,
                score = %best.score,
                %confidence,
                %preference,
                "Best size selected"
            ),
            None => info!(chart = %cmd.chart_location, "No size to recommend"),
        }

        Ok(RecommendSizeResult {
            preference,
            analyses,
            best,
            confidence,
            quick_pick,
            fit_result,
            excluded: intake.excluded,
            reliability: cmd.profile.reliability(self.settings.min_confidence),
        })
    }
}
