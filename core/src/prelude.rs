use serde::{Deserialize, Serialize};

/// Landmark points reported per detected hand.
pub const LANDMARKS_PER_HAND: usize = 21;
/// Coordinates per landmark point (x, y, z).
pub const COORDS_PER_LANDMARK: usize = 3;
/// Values occupied by one hand inside a feature vector.
pub const HAND_BLOCK: usize = LANDMARKS_PER_HAND * COORDS_PER_LANDMARK;
/// Hands the encoder places into a feature vector; any further hands are ignored.
pub const MAX_HANDS: usize = 2;
/// Width of a feature vector holding exactly two hand blocks.
pub const TWO_HAND_WIDTH: usize = HAND_BLOCK * MAX_HANDS;

/// How detected hands are assigned to hand blocks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyingMode {
    /// Block 0 holds the hand classified `Left`, block 1 the hand classified `Right`.
    Handedness,
    /// Block `i` holds the `i`-th hand in the order the detector reported it.
    DetectionOrder,
}

/// Shared layout configuration for the feature encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncoderConfig {
    pub mode: KeyingMode,
    pub width: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mode: KeyingMode::Handedness,
            width: TWO_HAND_WIDTH,
        }
    }
}

/// Common error type for the toolkit core.
#[derive(thiserror::Error, Debug)]
pub enum HandSignError {
    #[error("invalid feature layout: {0}")]
    InvalidLayout(String),
    #[error("input width mismatch: provided {provided}, model expects {expected}")]
    InputWidthMismatch { provided: usize, expected: usize },
    #[error("class index {index} out of range for {count} labels")]
    LabelOutOfRange { index: usize, count: usize },
    #[error("model produced no usable output: {0}")]
    EmptyOutput(String),
    #[error("model failure: {0}")]
    Model(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed detection frame: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HandSignResult<T> = Result<T, HandSignError>;
