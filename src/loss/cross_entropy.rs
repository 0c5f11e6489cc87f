/// Categorical cross-entropy, evaluated one output node at a time.
pub struct CategoricalCrossEntropy;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CategoricalCrossEntropy {
    /// -expected·log(actual + ε)
    pub fn cost(expected: f64, actual: f64) -> f64 {
        -expected * (actual + EPS).ln()
    }

    /// -expected / (actual + ε)
    ///
    /// This is the node-wise derivative only. It is not the fused
    /// softmax + cross-entropy gradient `actual - expected`.
    pub fn derivative(expected: f64, actual: f64) -> f64 {
        -expected / (actual + EPS)
    }
}
