use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// One training example: an input column and the expected output column.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledDataPoint {
    pub input: Matrix,
    pub output: Matrix,
}

impl LabelledDataPoint {
    pub fn new(input: Matrix, output: Matrix) -> Result<Self> {
        if !input.is_column() {
            return Err(Error::shape("data point input", (input.rows(), 1), input.shape()));
        }
        if !output.is_column() {
            return Err(Error::shape("data point output", (output.rows(), 1), output.shape()));
        }
        Ok(LabelledDataPoint { input, output })
    }

    pub fn from_slices(input: &[f64], output: &[f64]) -> Result<Self> {
        LabelledDataPoint::new(Matrix::column(input.to_vec())?, Matrix::column(output.to_vec())?)
    }
}
