pub struct AbsoluteError;

impl AbsoluteError {
    /// |expected - actual|
    pub fn cost(expected: f64, actual: f64) -> f64 {
        (expected - actual).abs()
    }

    /// Subgradient sign(actual - expected), 0 when equal.
    pub fn derivative(expected: f64, actual: f64) -> f64 {
        let diff = actual - expected;
        if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 }
    }
}
