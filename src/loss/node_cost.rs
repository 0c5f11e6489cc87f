use serde::{Serialize, Deserialize};

use super::absolute_error::AbsoluteError;
use super::bce::BinaryCrossEntropy;
use super::cross_entropy::CategoricalCrossEntropy;
use super::huber::Huber;
use super::squared_error::SquaredError;

/// Selects the per-node cost `cost(expected, actual)` and its derivative
/// with respect to `actual`.
///
/// - `SquaredError`            — regression; pair with Linear or Sigmoid output.
/// - `AbsoluteError`           — regression, robust to outliers.
/// - `Huber`                   — squared near zero, absolute beyond δ = 1.
/// - `BinaryCrossEntropy`      — pair with Sigmoid output.
/// - `CategoricalCrossEntropy` — node-wise only; see `CategoricalCrossEntropy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCost {
    SquaredError,
    AbsoluteError,
    Huber,
    BinaryCrossEntropy,
    CategoricalCrossEntropy,
}

impl NodeCost {
    pub fn cost(&self, expected: f64, actual: f64) -> f64 {
        match self {
            NodeCost::SquaredError => SquaredError::cost(expected, actual),
            NodeCost::AbsoluteError => AbsoluteError::cost(expected, actual),
            NodeCost::Huber => Huber::cost(expected, actual),
            NodeCost::BinaryCrossEntropy => BinaryCrossEntropy::cost(expected, actual),
            NodeCost::CategoricalCrossEntropy => CategoricalCrossEntropy::cost(expected, actual),
        }
    }

    pub fn derivative(&self, expected: f64, actual: f64) -> f64 {
        match self {
            NodeCost::SquaredError => SquaredError::derivative(expected, actual),
            NodeCost::AbsoluteError => AbsoluteError::derivative(expected, actual),
            NodeCost::Huber => Huber::derivative(expected, actual),
            NodeCost::BinaryCrossEntropy => BinaryCrossEntropy::derivative(expected, actual),
            NodeCost::CategoricalCrossEntropy => CategoricalCrossEntropy::derivative(expected, actual),
        }
    }
}
