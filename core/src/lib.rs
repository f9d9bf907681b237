//! Core of the hand-sign toolkit.
//!
//! Detector results come in as [`landmark::DetectionFrame`]s, the
//! [`features::FeatureEncoder`] turns them into fixed-width vectors, and those
//! vectors are either stored as labeled CSV samples ([`dataset`]) or fed to a
//! gesture classifier ([`inference`]).

pub mod dataset;
pub mod features;
pub mod inference;
pub mod landmark;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use ndarray;

pub use features::{FeatureEncoder, FeatureVector};
pub use landmark::{DetectionFrame, HandDetection, Handedness};
pub use prelude::{EncoderConfig, HandSignError, HandSignResult, KeyingMode};
