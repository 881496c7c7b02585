//! FitResult - Record of a recommendation for one user and one item.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClothingItemId, Confidence, FitResultId, Timestamp, UserId};

use super::confidence::ConfidenceEstimator;
use super::recommendation::{RecommendationSelector, SizeFitAnalysis};
use super::zone::FitZone;

/// A generated recommendation, ready to hand to storage or display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub id: FitResultId,
    pub user_id: UserId,
    pub clothing_item_id: ClothingItemId,
    pub recommended_size: String,
    pub fit_zones: Vec<FitZone>,
    pub confidence_score: Confidence,
    pub explanation: String,
    pub generated_at: Timestamp,
}

impl FitResult {
    /// Builds a result from the best of `analyses`.
    ///
    /// Returns `None` when there is nothing to recommend.
    pub fn generate(
        user_id: UserId,
        clothing_item_id: ClothingItemId,
        analyses: &[SizeFitAnalysis],
    ) -> Option<Self> {
        let best = RecommendationSelector::best_size(analyses)?;
        Some(Self {
            id: FitResultId::new(),
            user_id,
            clothing_item_id,
            recommended_size: best.size.clone(),
            fit_zones: best.fit_zones.clone(),
            confidence_score: ConfidenceEstimator::confidence(&best.fit_zones),
            explanation: best.explanation.clone(),
            generated_at: Timestamp::now(),
        })
    }
}
