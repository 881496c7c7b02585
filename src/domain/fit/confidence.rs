//! Confidence in a recommendation, from zone agreement.

use crate::domain::foundation::Confidence;

use super::zone::FitZone;

/// Estimator for recommendation confidence.
pub struct ConfidenceEstimator;

impl ConfidenceEstimator {
    /// Share of zones with a good fit. Empty input yields zero.
    pub fn confidence(zones: &[FitZone]) -> Confidence {
        let good = zones.iter().filter(|z| z.is_good()).count();
        Confidence::ratio(good, zones.len())
    }
}
