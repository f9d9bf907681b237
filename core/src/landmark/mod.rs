pub mod hand;

pub use hand::{DetectionFrame, HandDetection, Handedness};
