//! Unit conversion and torso proportion helpers.

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Typical adult torso length as a share of standing height.
pub const AVERAGE_TORSO_RATIO: f64 = 0.52;

/// Converts inches to centimeters.
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Converts centimeters to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Torso length divided by height.
pub fn torso_ratio(height: f64, torso_length: f64) -> f64 {
    torso_length / height
}

/// Torso length estimated from height when it was not measured.
pub fn estimate_torso_length(height: f64) -> f64 {
    height * AVERAGE_TORSO_RATIO
}
