use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    activation::activation::ActivationFunction,
    data::{batch::batches, source::DataSource},
    error::{Error, Result},
    loss::{learning_error::LearningError, node_cost::NodeCost},
    network::network::Network,
    optim::options::OptionsOverride,
    problem::problem::ProblemSpecification,
    train::{
        epoch_stats::{EpochStats, TrainingSummary},
        trainer::Trainer,
    },
};

impl Trainer {
    /// Trains `network` for `config.epochs` epochs over `data`.
    ///
    /// Each epoch pulls a fresh sequence from `data`, cuts it into batches of
    /// `config.batch_size` (the remainder included) and runs `learn_batch`
    /// on each. Weights are redrawn first when `config.randomize_weights`
    /// is set.
    ///
    /// # Early termination
    /// The loop stops between epochs if `config.stop_flag` is set or the
    /// `progress_tx` receiver has been dropped. Any error aborts the call;
    /// updates from batches that already ran are kept.
    pub fn train(
        &mut self,
        problem: &ProblemSpecification,
        network: &mut Network,
        data: &mut dyn DataSource,
        learning_error: &LearningError,
        options_override: Option<&OptionsOverride>,
    ) -> Result<TrainingSummary> {
        self.config.validate()?;
        problem.validate_network(network)?;
        check_supported(network, learning_error)?;
        self.optimizer.options.with_override(options_override)?;

        let mut gradients = self.initialize_gradient_data(network);
        if self.config.randomize_weights {
            let mut rng = self.config.rng();
            self.randomize_weights(network, &mut rng);
        }

        let mut summary = TrainingSummary {
            epochs_completed: 0,
            last_epoch_cost: None,
            stopped_early: false,
        };

        for epoch in 1..=self.config.epochs {
            if self.stop_requested() {
                summary.stopped_early = true;
                break;
            }

            let t_start = Instant::now();
            let mut total_cost = 0.0;
            let mut samples = 0;
            let mut batch_count = 0;

            for (index, batch) in batches(data.next_epoch(), self.config.batch_size)?.enumerate() {
                let cost = self.learn_batch(network, &mut gradients, learning_error, &batch, options_override)?;
                debug!(epoch, batch = index, size = batch.len(), cost, "batch done");
                total_cost += cost * batch.len() as f64;
                samples += batch.len();
                batch_count += 1;
            }

            let elapsed_ms = t_start.elapsed().as_millis() as u64;
            summary.epochs_completed = epoch;
            if samples == 0 {
                warn!(epoch, "data source produced no points");
                continue;
            }

            let train_cost = total_cost / samples as f64;
            summary.last_epoch_cost = Some(train_cost);
            if train_cost.is_finite() {
                info!(epoch, total = self.config.epochs, cost = train_cost, elapsed_ms, "epoch done");
            } else {
                warn!(epoch, cost = train_cost, "training diverged");
            }

            let stats = EpochStats {
                epoch,
                total_epochs: self.config.epochs,
                train_cost,
                batches: batch_count,
                samples,
                elapsed_ms,
            };
            if let Some(ref tx) = self.config.progress_tx {
                if tx.send(stats).is_err() {
                    summary.stopped_early = epoch < self.config.epochs;
                    break;
                }
            }
        }

        Ok(summary)
    }

    fn stop_requested(&self) -> bool {
        self.config
            .stop_flag
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

/// Softmax is catalogued node-wise (derivative 1), which only gives correct
/// gradients when fused with cross-entropy through the full Jacobian. That
/// fusion does not exist, so the pairing is refused.
fn check_supported(network: &Network, learning_error: &LearningError) -> Result<()> {
    if network.output_layer().activator == ActivationFunction::Softmax
        && learning_error.node_cost == NodeCost::CategoricalCrossEntropy
    {
        return Err(Error::Unsupported(
            "softmax output combined with categorical cross-entropy".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    use super::*;
    use crate::data::{point::LabelledDataPoint, source::Dataset};
    use crate::loss::reduction::Reduction;
    use crate::optim::gradient_descent::GradientDescent;
    use crate::problem::problem::ProblemKind;
    use crate::train::train_config::TrainConfig;

    fn problem() -> ProblemSpecification {
        ProblemSpecification::regression(2, 1, LearningError::mean_squared())
    }

    fn network() -> Network {
        Network::new(&[
            (2, ActivationFunction::Linear),
            (3, ActivationFunction::Tanh),
            (1, ActivationFunction::Linear),
        ])
        .unwrap()
    }

    fn dataset(n: usize) -> Dataset {
        Dataset::new(
            (0..n)
                .map(|i| {
                    let x = i as f64 / n as f64;
                    LabelledDataPoint::from_slices(&[x, 1.0 - x], &[0.5 * x]).unwrap()
                })
                .collect(),
        )
    }

    fn seeded(epochs: usize, batch_size: usize) -> TrainConfig {
        let mut config = TrainConfig::new(epochs, batch_size);
        config.seed = Some(42);
        config
    }

    #[test]
    fn runs_every_epoch_and_reports_progress() {
        let (tx, rx) = mpsc::channel();
        let mut config = seeded(3, 4);
        config.progress_tx = Some(tx);
        let mut trainer = Trainer::new(GradientDescent::plain(0.05), config);
        let mut net = network();
        let summary = trainer
            .train(&problem(), &mut net, &mut dataset(10), &LearningError::mean_squared(), None)
            .unwrap();
        drop(trainer);

        assert_eq!(summary.epochs_completed, 3);
        assert!(!summary.stopped_early);
        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].batches, 3);
        assert_eq!(stats[0].samples, 10);
        assert_eq!(summary.last_epoch_cost, Some(stats[2].train_cost));
    }

    #[test]
    fn same_seed_same_result() {
        let run = || {
            let mut trainer = Trainer::new(GradientDescent::plain(0.05), seeded(2, 3));
            let mut net = network();
            trainer
                .train(&problem(), &mut net, &mut dataset(7), &LearningError::mean_squared(), None)
                .unwrap();
            net.incoming_weights(1).unwrap().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn stop_flag_ends_training_before_the_first_epoch() {
        let mut config = seeded(5, 2);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let mut trainer = Trainer::new(GradientDescent::plain(0.05), config);
        let summary = trainer
            .train(&problem(), &mut network(), &mut dataset(4), &LearningError::mean_squared(), None)
            .unwrap();
        assert_eq!(summary.epochs_completed, 0);
        assert!(summary.stopped_early);
    }

    #[test]
    fn dropped_receiver_stops_training() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = seeded(5, 2);
        config.progress_tx = Some(tx);
        let mut trainer = Trainer::new(GradientDescent::plain(0.05), config);
        let summary = trainer
            .train(&problem(), &mut network(), &mut dataset(4), &LearningError::mean_squared(), None)
            .unwrap();
        assert_eq!(summary.epochs_completed, 1);
        assert!(summary.stopped_early);
    }

    #[test]
    fn softmax_with_categorical_cross_entropy_is_unsupported() {
        let mut net = Network::new(&[(2, ActivationFunction::Linear), (2, ActivationFunction::Softmax)]).unwrap();
        let le = LearningError::new(NodeCost::CategoricalCrossEntropy, Reduction::Sum, Reduction::Mean);
        let problem = ProblemSpecification {
            input_size: 2,
            output_size: 2,
            kind: ProblemKind::Classification { class_labels: vec!["a".into(), "b".into()] },
            learning_error: le,
        };
        let mut trainer = Trainer::new(GradientDescent::plain(0.1), seeded(1, 1));
        let err = trainer.train(&problem, &mut net, &mut dataset(0), &le, None).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn mismatched_problem_dimensions_are_rejected() {
        let problem = ProblemSpecification::regression(3, 1, LearningError::mean_squared());
        let mut trainer = Trainer::new(GradientDescent::plain(0.1), seeded(1, 1));
        let err = trainer
            .train(&problem, &mut network(), &mut dataset(2), &LearningError::mean_squared(), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTopology(_)));
    }

    #[test]
    fn invalid_override_fails_before_training() {
        let mut trainer = Trainer::new(GradientDescent::plain(0.1), seeded(1, 1));
        let mut net = network();
        net.set_incoming_weights(1, crate::math::matrix::Matrix::filled(3, 2, 0.25).unwrap()).unwrap();
        let o = OptionsOverride { momentum: Some(0.9), ..Default::default() };
        let err = trainer
            .train(&problem(), &mut net, &mut dataset(2), &LearningError::mean_squared(), Some(&o))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
        assert_eq!(net.incoming_weights(1).unwrap().to_vec(), vec![0.25; 6]);
    }

    #[test]
    fn empty_epochs_leave_no_cost() {
        let mut trainer = Trainer::new(GradientDescent::plain(0.1), seeded(2, 1));
        let summary = trainer
            .train(&problem(), &mut network(), &mut dataset(0), &LearningError::mean_squared(), None)
            .unwrap();
        assert_eq!(summary.epochs_completed, 2);
        assert_eq!(summary.last_epoch_cost, None);
    }
}
