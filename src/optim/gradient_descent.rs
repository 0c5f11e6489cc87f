use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    math::mutable::MutableMatrix,
    network::network::Network,
    optim::options::{GradientDescentOptions, OptionsOverride},
    train::gradient_data::GradientData,
};

/// Momentum state for one trainable layer.
#[derive(Debug, Clone)]
struct Velocity {
    weights: MutableMatrix,
    biases: MutableMatrix,
}

/// Gradient-descent optimizer.
///
/// The same update rule serves every variant: plain descent is momentum
/// without a velocity, and regularization only scales the current weight.
/// Velocities live here and survive across batches for as long as the
/// optimizer does.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    pub options: GradientDescentOptions,
    velocities: HashMap<usize, Velocity>,
}

impl GradientDescent {
    pub fn new(options: GradientDescentOptions) -> GradientDescent {
        GradientDescent { options, velocities: HashMap::new() }
    }

    /// Shorthand for plain descent.
    pub fn plain(learning_rate: f64) -> GradientDescent {
        GradientDescent::new(GradientDescentOptions::plain(learning_rate))
    }

    /// Applies one update to the layer `gradients` belongs to, using the
    /// (already batch-averaged) gradients it holds.
    pub fn update_weights_and_biases(
        &mut self,
        network: &mut Network,
        gradients: &GradientData,
        options_override: Option<&OptionsOverride>,
    ) -> Result<()> {
        let options = self.options.with_override(options_override)?;
        let layer = gradients.layer_index();
        let (weights, biases) = network.parameters_mut(layer)?;
        if weights.shape() != gradients.weight_gradients().shape() {
            return Err(Error::shape("update_weights_and_biases", weights.shape(), gradients.weight_gradients().shape()));
        }

        let learning_rate = options.learning_rate();
        let decay = 1.0 - learning_rate * options.regularization_factor().unwrap_or(0.0);

        match options.momentum_factor() {
            None => {
                step(weights, gradients.weight_gradients(), |w, g| decay * w - learning_rate * g);
                step(biases, gradients.bias_gradients(), |b, g| b - learning_rate * g);
            }
            Some(momentum) => {
                let velocity = self.velocity_for(layer, weights.shape(), biases.rows());
                accelerate(&mut velocity.weights, gradients.weight_gradients(), momentum, learning_rate);
                accelerate(&mut velocity.biases, gradients.bias_gradients(), momentum, learning_rate);
                weights.add_in_place(&velocity.weights)?;
                biases.add_in_place(&velocity.biases)?;
            }
        }
        Ok(())
    }

    /// Forgets all momentum state.
    pub fn reset_velocities(&mut self) {
        self.velocities.clear();
    }

    fn velocity_for(&mut self, layer: usize, weight_shape: (usize, usize), bias_rows: usize) -> &mut Velocity {
        let entry = self.velocities.entry(layer).or_insert_with(|| Velocity {
            weights: MutableMatrix::zeroed(weight_shape.0, weight_shape.1),
            biases: MutableMatrix::zeroed(bias_rows, 1),
        });
        if entry.weights.shape() != weight_shape {
            *entry = Velocity {
                weights: MutableMatrix::zeroed(weight_shape.0, weight_shape.1),
                biases: MutableMatrix::zeroed(bias_rows, 1),
            };
        }
        entry
    }
}

/// `values[i][j] = rule(values[i][j], gradients[i][j])`; shapes are checked
/// by the caller.
fn step<F>(values: &mut MutableMatrix, gradients: &MutableMatrix, rule: F)
where
    F: Fn(f64, f64) -> f64,
{
    let (rows, cols) = values.shape();
    for i in 0..rows {
        for j in 0..cols {
            let updated = rule(values.at(i, j), gradients.at(i, j));
            values.put(i, j, updated);
        }
    }
}

/// `v ← μ·v − η·g`
fn accelerate(velocity: &mut MutableMatrix, gradients: &MutableMatrix, momentum: f64, learning_rate: f64) {
    step(velocity, gradients, |v, g| momentum * v - learning_rate * g);
}
