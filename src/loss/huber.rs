pub struct Huber;

const DELTA: f64 = 1.0;

impl Huber {
    /// h(x) = 0.5·x²          if |x| ≤ δ
    ///        δ·(|x| − 0.5·δ)  otherwise
    /// with x = actual − expected.
    pub fn cost(expected: f64, actual: f64) -> f64 {
        let x = actual - expected;
        if x.abs() <= DELTA {
            0.5 * x * x
        } else {
            DELTA * (x.abs() - 0.5 * DELTA)
        }
    }

    /// x if |x| ≤ δ, else δ·sign(x)
    pub fn derivative(expected: f64, actual: f64) -> f64 {
        let x = actual - expected;
        if x.abs() <= DELTA { x } else { DELTA * x.signum() }
    }
}
