pub struct SquaredError;

impl SquaredError {
    /// (expected - actual)²
    pub fn cost(expected: f64, actual: f64) -> f64 {
        (expected - actual).powi(2)
    }

    /// ∂cost/∂actual = 2·(actual - expected)
    pub fn derivative(expected: f64, actual: f64) -> f64 {
        2.0 * (actual - expected)
    }
}
