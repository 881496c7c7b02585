//! Anatomical landmarks as produced by a pose-estimation provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::Confidence;

/// Named anatomical landmarks.
///
/// Indices follow the 33-point BlazePose topology so that providers
/// emitting index-ordered landmark arrays can be mapped directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl LandmarkName {
    /// Landmarks the measurement extractor cannot work without.
    pub const REQUIRED: [LandmarkName; 7] = [
        LandmarkName::Nose,
        LandmarkName::LeftShoulder,
        LandmarkName::RightShoulder,
        LandmarkName::LeftHip,
        LandmarkName::RightHip,
        LandmarkName::LeftAnkle,
        LandmarkName::RightAnkle,
    ];

    /// Maps a BlazePose landmark index to its name.
    ///
    /// Hand, heel and foot-index points have no counterpart and map to `None`.
    pub fn from_pose_index(index: usize) -> Option<Self> {
        let name = match index {
            0 => LandmarkName::Nose,
            2 => LandmarkName::LeftEye,
            5 => LandmarkName::RightEye,
            7 => LandmarkName::LeftEar,
            8 => LandmarkName::RightEar,
            11 => LandmarkName::LeftShoulder,
            12 => LandmarkName::RightShoulder,
            13 => LandmarkName::LeftElbow,
            14 => LandmarkName::RightElbow,
            15 => LandmarkName::LeftWrist,
            16 => LandmarkName::RightWrist,
            23 => LandmarkName::LeftHip,
            24 => LandmarkName::RightHip,
            25 => LandmarkName::LeftKnee,
            26 => LandmarkName::RightKnee,
            27 => LandmarkName::LeftAnkle,
            28 => LandmarkName::RightAnkle,
            _ => return None,
        };
        Some(name)
    }

    /// Returns the snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::Nose => "nose",
            LandmarkName::LeftEye => "left_eye",
            LandmarkName::RightEye => "right_eye",
            LandmarkName::LeftEar => "left_ear",
            LandmarkName::RightEar => "right_ear",
            LandmarkName::LeftShoulder => "left_shoulder",
            LandmarkName::RightShoulder => "right_shoulder",
            LandmarkName::LeftElbow => "left_elbow",
            LandmarkName::RightElbow => "right_elbow",
            LandmarkName::LeftWrist => "left_wrist",
            LandmarkName::RightWrist => "right_wrist",
            LandmarkName::LeftHip => "left_hip",
            LandmarkName::RightHip => "right_hip",
            LandmarkName::LeftKnee => "left_knee",
            LandmarkName::RightKnee => "right_knee",
            LandmarkName::LeftAnkle => "left_ankle",
            LandmarkName::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single landmark position with optional depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
}

impl Landmark {
    /// Creates a 2D landmark.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a landmark with depth.
    pub const fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance, including depth when either point carries it.
    pub fn distance(&self, other: &Landmark) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z.unwrap_or(0.0) - self.z.unwrap_or(0.0);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Planar distance, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Planar midpoint between two landmarks. Depth is dropped.
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    fn scaled(&self, width: f64, height: f64) -> Landmark {
        Landmark {
            x: self.x * width,
            y: self.y * height,
            // Depth shares the horizontal scale.
            z: self.z.map(|z| z * width),
        }
    }
}

/// Coordinate system of a landmark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Fractions of the image width/height in 0..1.
    #[default]
    Normalized,
    /// Absolute image pixels.
    Pixel,
}

/// One detected body: named landmarks in a single coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    space: CoordinateSpace,
    points: BTreeMap<LandmarkName, Landmark>,
}

impl LandmarkSet {
    /// Creates an empty set in the given coordinate space.
    pub fn new(space: CoordinateSpace) -> Self {
        Self {
            space,
            points: BTreeMap::new(),
        }
    }

    /// Creates a set from BlazePose index-ordered points, skipping indices
    /// with no named counterpart.
    pub fn from_pose_indices(space: CoordinateSpace, points: &[Landmark]) -> Self {
        let points = points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| LandmarkName::from_pose_index(i).map(|name| (name, *p)))
            .collect();
        Self { space, points }
    }

    /// Adds or replaces a landmark.
    pub fn with(mut self, name: LandmarkName, landmark: Landmark) -> Self {
        self.points.insert(name, landmark);
        self
    }

    /// Returns the coordinate space.
    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    /// Looks up a landmark.
    pub fn get(&self, name: LandmarkName) -> Option<&Landmark> {
        self.points.get(&name)
    }

    /// Number of landmarks present.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no landmarks are present.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Required landmarks absent from this set, in canonical order.
    pub fn missing_required(&self) -> Vec<LandmarkName> {
        LandmarkName::REQUIRED
            .iter()
            .filter(|name| !self.points.contains_key(name))
            .copied()
            .collect()
    }

    /// Converts the set into pixel space for an image of the given size.
    ///
    /// Pixel-space sets are returned unchanged.
    pub fn to_pixel_space(&self, image_width: u32, image_height: u32) -> LandmarkSet {
        match self.space {
            CoordinateSpace::Pixel => self.clone(),
            CoordinateSpace::Normalized => {
                let (w, h) = (f64::from(image_width), f64::from(image_height));
                LandmarkSet {
                    space: CoordinateSpace::Pixel,
                    points: self
                        .points
                        .iter()
                        .map(|(name, p)| (*name, p.scaled(w, h)))
                        .collect(),
                }
            }
        }
    }

    /// Returns a copy with every coordinate multiplied by `factor`.
    pub fn rescaled(&self, factor: f64) -> LandmarkSet {
        LandmarkSet {
            space: self.space,
            points: self
                .points
                .iter()
                .map(|(name, p)| (*name, p.scaled(factor, factor)))
                .collect(),
        }
    }
}

/// One pose found by the provider, with its self-reported reliability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPose {
    pub landmarks: LandmarkSet,
    #[serde(default)]
    pub confidence: Option<Confidence>,
}

impl DetectedPose {
    /// Creates a pose without a provider confidence.
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self {
            landmarks,
            confidence: None,
        }
    }

    /// Attaches a provider confidence.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Everything the provider found in one image. Empty when no body was seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDetection {
    pub poses: Vec<DetectedPose>,
}

impl PoseDetection {
    /// A detection that found no body.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A detection with exactly one pose.
    pub fn single(pose: DetectedPose) -> Self {
        Self { poses: vec![pose] }
    }

    /// Returns the first (primary) pose, if any.
    pub fn primary(&self) -> Option<&DetectedPose> {
        self.poses.first()
    }

    /// Returns true if no pose was found.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
