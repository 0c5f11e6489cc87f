pub struct BinaryCrossEntropy;

const EPS: f64 = 1e-12;

impl BinaryCrossEntropy {
    /// -(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn cost(expected: f64, actual: f64) -> f64 {
        -(expected * (actual + EPS).ln() + (1.0 - expected) * (1.0 - actual + EPS).ln())
    }

    /// (p - y) / ((p + ε)·(1 - p + ε))
    pub fn derivative(expected: f64, actual: f64) -> f64 {
        (actual - expected) / ((actual + EPS) * (1.0 - actual + EPS))
    }
}
