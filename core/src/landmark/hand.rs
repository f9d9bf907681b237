use serde::{Deserialize, Deserializer, Serialize};

use crate::prelude::{HandSignResult, LANDMARKS_PER_HAND};

/// Handedness label attached to a detected hand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Handedness {
    Left,
    Right,
    /// Any other classification, or none at all.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single hand reported by the external landmark detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandDetection {
    #[serde(default, deserialize_with = "handedness_or_unknown")]
    pub handedness: Handedness,
    /// Normalized `[x, y, z]` image coordinates, expected to hold 21 points.
    pub landmarks: Vec<[f32; 3]>,
}

/// A `null` handedness reads as `Unknown`, like a missing or unexpected one.
fn handedness_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Handedness, D::Error> {
    Ok(Option::<Handedness>::deserialize(deserializer)?.unwrap_or_default())
}

impl HandDetection {
    pub fn new(handedness: Handedness, landmarks: Vec<[f32; 3]>) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    /// A hand whose 21 landmarks all sit at `point`.
    pub fn uniform(handedness: Handedness, point: [f32; 3]) -> Self {
        Self::new(handedness, vec![point; LANDMARKS_PER_HAND])
    }

    /// Landmark coordinates flattened in per-point `(x, y, z)` order.
    pub fn flattened(&self) -> impl Iterator<Item = f32> + '_ {
        self.landmarks
            .iter()
            .take(LANDMARKS_PER_HAND)
            .flat_map(|point| point.iter().copied())
    }
}

/// Detector result for one video frame, plus the key pressed while it was shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DetectionFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<char>,
    /// Hands in the order the detector reported them.
    #[serde(default)]
    pub hands: Vec<HandDetection>,
}

impl DetectionFrame {
    pub fn new(hands: Vec<HandDetection>) -> Self {
        Self {
            hands,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    /// Parses one JSON line as emitted by the detector bridge.
    pub fn from_json_line(line: &str) -> HandSignResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_json_line(&self) -> HandSignResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }
}
