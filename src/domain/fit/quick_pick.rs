//! Weighted nearest-size pick, without preference or ease.

use crate::domain::measurement::BodyMeasurementProfile;

use super::size_chart::SizeChartEntry;

const CHEST_WEIGHT: f64 = 2.0;
const SHOULDER_WEIGHT: f64 = 1.5;
const WAIST_WEIGHT: f64 = 1.0;

/// Weighted absolute distance between a body and one size.
pub fn size_distance(body: &BodyMeasurementProfile, garment: &SizeChartEntry) -> f64 {
    let chest = (garment.chest() - body.chest()).abs() * CHEST_WEIGHT;
    let shoulder = (garment.shoulder() - body.shoulder()).abs() * SHOULDER_WEIGHT;
    let waist = garment
        .waist()
        .map(|w| (w - body.waist()).abs() * WAIST_WEIGHT)
        .unwrap_or(0.0);
    chest + shoulder + waist
}

/// Returns the size closest to the body's raw measurements.
///
/// Ties go to the earliest entry; an empty chart returns `None`.
pub fn quick_pick_size<'a>(
    body: &BodyMeasurementProfile,
    chart: &'a [SizeChartEntry],
) -> Option<&'a SizeChartEntry> {
    chart
        .iter()
        .map(|entry| (entry, size_distance(body, entry)))
        .fold(None, |best: Option<(&SizeChartEntry, f64)>, (entry, distance)| {
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((entry, distance)),
            }
        })
        .map(|(entry, _)| entry)
}
