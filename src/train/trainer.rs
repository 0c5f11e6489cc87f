use rand::Rng;
use rayon::prelude::*;
use tracing::warn;

use crate::{
    data::point::LabelledDataPoint,
    error::{Error, Result},
    loss::learning_error::LearningError,
    math::matrix::Matrix,
    network::network::Network,
    optim::{gradient_descent::GradientDescent, options::OptionsOverride},
    train::{
        backprop::backpropagate,
        gradient_data::{merge_all, GradientData},
        train_config::TrainConfig,
    },
};

/// Drives forward and backward passes over batches and hands the averaged
/// gradients to the optimizer.
///
/// The optimizer (and with it any momentum state) lives as long as the
/// trainer does.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub optimizer: GradientDescent,
    pub config: TrainConfig,
}

impl Trainer {
    pub fn new(optimizer: GradientDescent, config: TrainConfig) -> Trainer {
        Trainer { optimizer, config }
    }

    /// One zeroed `GradientData` per trainable layer of `network`.
    pub fn initialize_gradient_data(&self, network: &Network) -> Vec<GradientData> {
        GradientData::for_network(network)
    }

    pub fn randomize_weights<R: Rng + ?Sized>(&self, network: &mut Network, rng: &mut R) {
        network.randomize_weights(rng);
    }

    /// Mean over data-point columns of the per-column cost.
    pub fn calculate_cost(learning_error: &LearningError, actual: &Matrix, desired: &Matrix) -> Result<f64> {
        if actual.shape() != desired.shape() {
            return Err(Error::shape("calculate_cost", desired.shape(), actual.shape()));
        }
        let mut total = 0.0;
        for j in 0..actual.cols() {
            total += learning_error.cost(&desired.column_at(j)?, &actual.column_at(j)?)?;
        }
        Ok(total / actual.cols() as f64)
    }

    /// Runs one batch: zero the accumulators, forward and backpropagate every
    /// point, average over the batch, then update every trainable layer.
    ///
    /// Returns the batch's mean cost measured before the update.
    pub fn learn_batch(
        &mut self,
        network: &mut Network,
        gradients: &mut [GradientData],
        learning_error: &LearningError,
        batch: &[LabelledDataPoint],
        options_override: Option<&OptionsOverride>,
    ) -> Result<f64> {
        if batch.is_empty() {
            return Err(Error::InvalidOptions("cannot learn from an empty batch".into()));
        }
        for data in gradients.iter_mut() {
            data.reset();
        }

        let total_cost = if self.config.parallel && batch.len() > 1 {
            accumulate_parallel(network, gradients, learning_error, batch)?
        } else {
            let mut total = 0.0;
            for point in batch {
                total += forward_and_backward(network, learning_error, point, gradients)?;
            }
            total
        };

        for data in gradients.iter_mut() {
            data.average(batch.len());
        }
        for data in gradients.iter() {
            self.optimizer.update_weights_and_biases(network, data, options_override)?;
        }

        let mean_cost = total_cost / batch.len() as f64;
        if !mean_cost.is_finite() {
            warn!(cost = mean_cost, batch_size = batch.len(), "batch cost is not finite");
        }
        Ok(mean_cost)
    }
}

/// Forward pass for one point followed by backpropagation into `gradients`.
/// Returns the point's cost.
pub(crate) fn forward_and_backward(
    network: &mut Network,
    learning_error: &LearningError,
    point: &LabelledDataPoint,
    gradients: &mut [GradientData],
) -> Result<f64> {
    let actual = network.forward(&point.input)?;
    let cost = learning_error.cost(&point.output, actual)?;
    backpropagate(network, learning_error, &point.output, gradients)?;
    Ok(cost)
}

/// Each rayon worker folds points into its own network copy and gradient
/// set; the partial sums are merged by addition into `gradients`.
fn accumulate_parallel(
    network: &Network,
    gradients: &mut [GradientData],
    learning_error: &LearningError,
    batch: &[LabelledDataPoint],
) -> Result<f64> {
    let template: Vec<GradientData> = gradients.to_vec();

    let (merged, total_cost) = batch
        .par_iter()
        .try_fold(
            || (network.clone(), template.clone(), 0.0),
            |(mut net, mut grads, cost), point| -> Result<(Network, Vec<GradientData>, f64)> {
                let c = forward_and_backward(&mut net, learning_error, point, &mut grads)?;
                Ok((net, grads, cost + c))
            },
        )
        .map(|partial| partial.map(|(_, grads, cost)| (grads, cost)))
        .try_reduce(
            || (template.clone(), 0.0),
            |(mut acc, cost_a), (grads, cost_b)| {
                merge_all(&mut acc, &grads)?;
                Ok((acc, cost_a + cost_b))
            },
        )?;

    for (data, summed) in gradients.iter_mut().zip(merged) {
        *data = summed;
    }
    Ok(total_cost)
}
