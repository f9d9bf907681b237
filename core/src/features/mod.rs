pub mod encoder;
pub mod vector;

pub use encoder::{FeatureEncoder, WIDE_LAYOUT_WIDTH};
pub use vector::FeatureVector;
