pub mod classifier;
pub mod tract;

pub use classifier::{validate_input_width, Classifier, OutputDecoding, Prediction, Predictor};
pub use tract::TractClassifier;
