//! Fit Zone Calculator - Per-area comparison of body against garment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::measurement::BodyMeasurementProfile;

use super::size_chart::SizeChartEntry;

/// Body area a zone describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitArea {
    Chest,
    Shoulder,
    Waist,
    Length,
}

impl FitArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitArea::Chest => "chest",
            FitArea::Shoulder => "shoulder",
            FitArea::Waist => "waist",
            FitArea::Length => "length",
        }
    }
}

impl fmt::Display for FitArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an area sits on the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    Tight,
    Good,
    Loose,
}

/// Comparison of one area. `difference` is garment minus body in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitZone {
    pub area: FitArea,
    pub status: FitStatus,
    pub difference: f64,
}

impl FitZone {
    pub fn new(area: FitArea, status: FitStatus, difference: f64) -> Self {
        Self {
            area,
            status,
            difference,
        }
    }

    pub fn is_good(&self) -> bool {
        self.status == FitStatus::Good
    }
}

/// Inclusive range of differences considered a good fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub min: f64,
    pub max: f64,
}

impl ZoneBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Tight below `min`, loose above `max`, good otherwise.
    pub fn classify(&self, difference: f64) -> FitStatus {
        if difference < self.min {
            FitStatus::Tight
        } else if difference > self.max {
            FitStatus::Loose
        } else {
            FitStatus::Good
        }
    }
}

/// Good-fit bands for the measured areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBands {
    pub chest: ZoneBand,
    pub shoulder: ZoneBand,
    pub waist: ZoneBand,
}

impl ZoneBands {
    pub const STANDARD: ZoneBands = ZoneBands {
        chest: ZoneBand::new(-1.0, 6.0),
        shoulder: ZoneBand::new(0.0, 4.0),
        waist: ZoneBand::new(0.0, 8.0),
    };
}

impl Default for ZoneBands {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Calculator for fit zones.
pub struct FitZoneCalculator;

impl FitZoneCalculator {
    /// Compares a body against one size using the standard bands.
    ///
    /// Zones come back in the order chest, shoulder, waist, length. Waist is
    /// omitted when the chart entry has no waist measurement.
    ///
    /// # Edge Cases
    ///
    /// - Length is always `Good` with a difference of 0: charts carry garment
    ///   length but the body profile has no comparable measurement.
    pub fn zones(body: &BodyMeasurementProfile, garment: &SizeChartEntry) -> Vec<FitZone> {
        Self::zones_with_bands(body, garment, &ZoneBands::STANDARD)
    }

    /// Compares a body against one size using explicit bands.
    pub fn zones_with_bands(
        body: &BodyMeasurementProfile,
        garment: &SizeChartEntry,
        bands: &ZoneBands,
    ) -> Vec<FitZone> {
        let mut zones = Vec::with_capacity(4);

        let chest = garment.chest() - body.chest();
        zones.push(FitZone::new(FitArea::Chest, bands.chest.classify(chest), chest));

        let shoulder = garment.shoulder() - body.shoulder();
        zones.push(FitZone::new(
            FitArea::Shoulder,
            bands.shoulder.classify(shoulder),
            shoulder,
        ));

        if let Some(garment_waist) = garment.waist() {
            let waist = garment_waist - body.waist();
            zones.push(FitZone::new(FitArea::Waist, bands.waist.classify(waist), waist));
        }

        zones.push(FitZone::new(FitArea::Length, FitStatus::Good, 0.0));
        zones
    }
}
