use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use super::node_cost::NodeCost;
use super::reduction::Reduction;

/// The cost a network is trained against.
///
/// Bundles the per-node cost and its derivative (`node_cost`), the fold of
/// node costs over an output column (`vector_cost`) and the reducer applied
/// to a column of distances or node costs (`total_cost`).
///
/// For a single data point `expected` and `actual` are `O`×1 columns.
///
/// Backpropagation differentiates node costs directly, ignoring
/// `vector_cost`: the gradients it produces match `cost` under
/// `Reduction::Sum` and are `O` times those of `cost` under `Reduction::Mean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningError {
    pub node_cost: NodeCost,
    pub vector_cost: Reduction,
    pub total_cost: Reduction,
}

impl LearningError {
    pub fn new(node_cost: NodeCost, vector_cost: Reduction, total_cost: Reduction) -> Self {
        LearningError { node_cost, vector_cost, total_cost }
    }

    /// Mean of squared errors over the output nodes.
    pub fn mean_squared() -> Self {
        LearningError::new(NodeCost::SquaredError, Reduction::Mean, Reduction::Mean)
    }

    pub fn node_cost_derivative(&self, expected: f64, actual: f64) -> f64 {
        self.node_cost.derivative(expected, actual)
    }

    /// Cost of output node `i`.
    pub fn node_cost_at(&self, expected: &Matrix, actual: &Matrix, i: usize) -> Result<f64> {
        check_columns(expected, actual)?;
        if i >= expected.rows() {
            return Err(Error::index("node", i, expected.rows()));
        }
        Ok(self.node_cost.cost(expected.at(i, 0), actual.at(i, 0)))
    }

    /// Column of per-node costs.
    pub fn node_costs(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        check_columns(expected, actual)?;
        Matrix::column(
            (0..expected.rows())
                .map(|i| self.node_cost.cost(expected.at(i, 0), actual.at(i, 0)))
                .collect(),
        )
    }

    /// `vector_cost` folded over every output node.
    pub fn cost(&self, expected: &Matrix, actual: &Matrix) -> Result<f64> {
        check_columns(expected, actual)?;
        Ok(self.vector_cost.reduce(
            (0..expected.rows()).map(|i| self.node_cost.cost(expected.at(i, 0), actual.at(i, 0))),
        ))
    }

    /// `expected - actual`, element-wise.
    pub fn distance(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        expected.subtract(actual)
    }

    /// Sum or mean of the components of `distance` as given; no squaring is
    /// applied. Meaningful when handed a column of node costs.
    pub fn distance_cost(&self, distance: &Matrix) -> f64 {
        self.total_cost.reduce(distance.iter())
    }
}

impl Default for LearningError {
    fn default() -> Self {
        LearningError::mean_squared()
    }
}

fn check_columns(expected: &Matrix, actual: &Matrix) -> Result<()> {
    if !expected.is_column() {
        return Err(Error::shape("cost", (expected.rows(), 1), expected.shape()));
    }
    if expected.shape() != actual.shape() {
        return Err(Error::shape("cost", expected.shape(), actual.shape()));
    }
    Ok(())
}
