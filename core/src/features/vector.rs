use ndarray::Array2;

/// Fixed-width classifier input built from one detection frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// All-zero vector of the given width.
    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0.0; width],
        }
    }

    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.values
    }

    /// Single-row `[1, L]` array, the shape classifiers are fed with.
    pub fn to_input(&self) -> Array2<f32> {
        Array2::from_shape_fn((1, self.values.len()), |(_, col)| self.values[col])
    }
}
