use rand::prelude::*;
use std::f64::consts::PI;

use crate::activation::activation::{ActivationFunction, InitializerKind};
use crate::error::Result;
use crate::math::matrix::{check_dimensions, Matrix};

/// Weight matrix of shape `(output_size, input_size)` for a layer using
/// `activation`, drawn from the thread-local RNG. Either size being 0 is a
/// ShapeError.
pub fn initialize(input_size: usize, output_size: usize, activation: ActivationFunction) -> Result<Matrix> {
    initialize_with(input_size, output_size, activation, &mut rand::thread_rng())
}

/// Same as [`initialize`] with a caller-supplied RNG, for reproducible runs.
pub fn initialize_with<R: Rng + ?Sized>(
    input_size: usize,
    output_size: usize,
    activation: ActivationFunction,
    rng: &mut R,
) -> Result<Matrix> {
    check_dimensions("initialize", output_size, input_size)?;
    Ok(draw_weights(input_size, output_size, activation, rng))
}

/// Unchecked draw for sizes taken from existing layers.
pub(crate) fn draw_weights<R: Rng + ?Sized>(
    input_size: usize,
    output_size: usize,
    activation: ActivationFunction,
    rng: &mut R,
) -> Matrix {
    let mut res = Matrix::zeroed(output_size, input_size);
    let kind = activation.initializer_kind();
    let data = res.data_mut();
    for row in data.iter_mut() {
        for w in row.iter_mut() {
            *w = sample(kind, input_size, output_size, rng);
        }
    }
    res
}

fn sample<R: Rng + ?Sized>(kind: InitializerKind, fan_in: usize, fan_out: usize, rng: &mut R) -> f64 {
    match kind {
        // He: N(0, sqrt(2 / fan_in)). ReLU zeroes half of its inputs on
        // average, hence the factor 2.
        InitializerKind::He => sample_standard_normal(rng) * (2.0 / fan_in as f64).sqrt(),
        // Normalized Xavier: U(-sqrt(6 / (fan_in + fan_out)), +...)
        InitializerKind::NormalizedXavier => {
            let bound = 6.0_f64.sqrt() / ((fan_in + fan_out) as f64).sqrt();
            rng.gen_range(-bound..bound)
        }
        // Xavier: U(-1 / sqrt(fan_in), +1 / sqrt(fan_in))
        InitializerKind::Xavier => {
            let bound = 1.0 / (fan_in as f64).sqrt();
            rng.gen_range(-bound..bound)
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Draw two independent uniform samples in (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn shape_is_output_by_input() {
        let w = initialize(4, 3, ActivationFunction::Relu).unwrap();
        assert_eq!(w.shape(), (3, 4));
    }

    #[test]
    fn xavier_bounds_hold() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = initialize_with(16, 8, ActivationFunction::Linear, &mut rng).unwrap();
        assert!(w.iter().all(|x| x.abs() <= 0.25));
        let w = initialize_with(16, 8, ActivationFunction::Sigmoid, &mut rng).unwrap();
        let bound = 6.0_f64.sqrt() / 24.0_f64.sqrt();
        assert!(w.iter().all(|x| x.abs() <= bound));
    }

    #[test]
    fn he_has_roughly_expected_variance() {
        let mut rng = StdRng::seed_from_u64(11);
        let w = initialize_with(50, 200, ActivationFunction::Relu, &mut rng).unwrap();
        let n = (w.rows() * w.cols()) as f64;
        let mean = w.sum() / n;
        let var = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!((var - 2.0 / 50.0).abs() < 0.005, "variance {var}");
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let a = initialize_with(3, 2, ActivationFunction::Tanh, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = initialize_with(3, 2, ActivationFunction::Tanh, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_layers_are_rejected() {
        assert!(matches!(initialize(0, 3, ActivationFunction::Linear), Err(crate::error::Error::Shape { .. })));
        let mut rng = StdRng::seed_from_u64(3);
        assert!(initialize_with(4, 0, ActivationFunction::Relu, &mut rng).is_err());
    }
}
