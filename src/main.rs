use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gradient_nn::{
    evaluate, ActivationFunction, Dataset, GradientDescent, LabelledDataPoint, LearningError, Network,
    ProblemSpecification, TrainConfig, Trainer,
};

// Trains a small [2, 3, 1] network on a linear target and prints the fit.
// Set RUST_LOG=debug to see per-batch costs.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "training failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> gradient_nn::Result<()> {
    let mut network = Network::new(&[
        (2, ActivationFunction::Linear),
        (3, ActivationFunction::Relu),
        (1, ActivationFunction::Linear),
    ])?;

    // y = 0.5·a - 0.25·b + 0.1 on a grid over [0, 1]²
    let mut points = Vec::new();
    for i in 0..10 {
        for j in 0..10 {
            let (a, b) = (i as f64 / 9.0, j as f64 / 9.0);
            points.push(LabelledDataPoint::from_slices(&[a, b], &[0.5 * a - 0.25 * b + 0.1])?);
        }
    }

    let learning_error = LearningError::mean_squared();
    let problem = ProblemSpecification::regression(2, 1, learning_error);
    let mut config = TrainConfig::new(200, 10);
    config.seed = Some(1);
    config.parallel = true;

    let mut trainer = Trainer::new(GradientDescent::plain(0.1), config);
    let mut data = Dataset::new(points.clone()).shuffled();
    let summary = trainer.train(&problem, &mut network, &mut data, &learning_error, None)?;

    let report = evaluate(&problem, &mut network, &points)?;
    info!(
        epochs = summary.epochs_completed,
        mean_cost = report.mean_cost,
        "finished"
    );
    Ok(())
}
