use log::debug;
use ndarray::{Array2, ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::dataset::LabelSet;
use crate::features::FeatureVector;
use crate::math::StatsHelper;
use crate::prelude::{HandSignError, HandSignResult};

/// A loaded gesture classifier taking `[1, L]` feature rows.
pub trait Classifier {
    /// `L`, the feature width the model declares for its input.
    fn input_width(&self) -> usize;
    fn run(&mut self, input: Array2<f32>) -> HandSignResult<ArrayD<f32>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn input_width(&self) -> usize {
        (**self).input_width()
    }

    fn run(&mut self, input: Array2<f32>) -> HandSignResult<ArrayD<f32>> {
        (**self).run(input)
    }
}

/// Fails when a feature row does not match the model's declared input width.
pub fn validate_input_width(provided: usize, expected: usize) -> HandSignResult<()> {
    if provided != expected {
        return Err(HandSignError::InputWidthMismatch { provided, expected });
    }
    Ok(())
}

/// How a model's output is turned into a class index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputDecoding {
    /// Per-class scores; the class is the argmax of the first row.
    #[default]
    Scores,
    /// The model emits the class index itself.
    ClassIndex,
}

impl OutputDecoding {
    pub fn decode(self, output: &ArrayD<f32>) -> HandSignResult<usize> {
        match self {
            OutputDecoding::Scores => {
                let row = first_row(output);
                StatsHelper::argmax(&row).ok_or_else(|| {
                    HandSignError::EmptyOutput(format!("no finite scores in {:?}", output.shape()))
                })
            }
            OutputDecoding::ClassIndex => {
                let value = output.iter().next().copied().ok_or_else(|| {
                    HandSignError::EmptyOutput("class index output is empty".into())
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(HandSignError::EmptyOutput(format!(
                        "class index {} is not a valid index",
                        value
                    )));
                }
                Ok(value.round() as usize)
            }
        }
    }
}

fn first_row(output: &ArrayD<f32>) -> Vec<f32> {
    if output.ndim() >= 2 && output.len_of(Axis(0)) > 0 {
        output.index_axis(Axis(0), 0).iter().copied().collect()
    } else {
        output.iter().copied().collect()
    }
}

/// Label predicted for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub scores: Vec<f32>,
}

/// Owns a classifier handle and the labels its class indices refer to.
pub struct Predictor<C> {
    classifier: C,
    labels: LabelSet,
    decoding: OutputDecoding,
}

impl<C: Classifier> Predictor<C> {
    pub fn new(classifier: C, labels: LabelSet, decoding: OutputDecoding) -> Self {
        Self {
            classifier,
            labels,
            decoding,
        }
    }

    pub fn input_width(&self) -> usize {
        self.classifier.input_width()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn predict(&mut self, features: &FeatureVector) -> HandSignResult<Prediction> {
        validate_input_width(features.len(), self.classifier.input_width())?;

        let output = self.classifier.run(features.to_input())?;
        debug!("raw output: {:?}", output);

        let index = self.decoding.decode(&output)?;
        let label = self.labels.get(index)?.to_string();
        Ok(Prediction {
            index,
            label,
            scores: output.iter().copied().collect(),
        })
    }
}
