//! ONNX gesture classifiers executed with `tract`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use ndarray::{Array2, ArrayD, IxDyn};
use tract_onnx::prelude::{
    tvec, Framework, Graph, InferenceModelExt, SimplePlan, TValue, Tensor, TypedFact, TypedOp,
};
use tract_onnx::prelude::tract_data::internal::DimLike;

use crate::inference::classifier::Classifier;
use crate::prelude::{HandSignError, HandSignResult};

type Model = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by an optimized ONNX graph, loaded once and reused per frame.
pub struct TractClassifier {
    model: Model,
    input_width: usize,
    path: PathBuf,
}

impl TractClassifier {
    /// Loads and optimizes the model at `path`.
    ///
    /// The input width is taken from the last dimension of the model's first
    /// input, which must be concrete.
    pub fn load(path: impl AsRef<Path>) -> HandSignResult<Self> {
        let path = path.as_ref().to_path_buf();
        let graph = tract_onnx::onnx()
            .model_for_path(&path)
            .and_then(|model| model.into_optimized())
            .map_err(|err| HandSignError::Model(format!("loading {}: {:#}", path.display(), err)))?;

        let fact = graph
            .input_fact(0)
            .map_err(|err| HandSignError::Model(format!("{:#}", err)))?;
        let input_width = fact
            .shape
            .last()
            .ok_or_else(|| HandSignError::Model("model input has no dimensions".into()))?
            .to_usize()
            .map_err(|err| {
                HandSignError::Model(format!("model input width is not concrete: {:#}", err))
            })?;

        let model = graph
            .into_runnable()
            .map_err(|err| HandSignError::Model(format!("{:#}", err)))?;

        info!(
            "loaded classifier {} expecting {} features",
            path.display(),
            input_width
        );
        Ok(Self {
            model,
            input_width,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Classifier for TractClassifier {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn run(&mut self, input: Array2<f32>) -> HandSignResult<ArrayD<f32>> {
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(input.shape(), &data)
            .map_err(|err| HandSignError::Model(format!("{:#}", err)))?;

        let outputs = self
            .model
            .run(tvec![TValue::from_const(Arc::new(tensor))])
            .map_err(|err| HandSignError::Model(format!("inference failed: {:#}", err)))?;
        let first = outputs
            .first()
            .ok_or_else(|| HandSignError::EmptyOutput("model returned no outputs".into()))?;

        let scores = first
            .cast_to::<f32>()
            .map_err(|err| HandSignError::Model(format!("{:#}", err)))?;
        let values = scores
            .as_slice::<f32>()
            .map_err(|err| HandSignError::Model(format!("{:#}", err)))?
            .to_vec();
        ArrayD::from_shape_vec(IxDyn(scores.shape()), values)
            .map_err(|err| HandSignError::Model(err.to_string()))
    }
}
