use gradient_nn::{
    evaluate, ActivationFunction, Dataset, GradientDescent, GradientDescentOptions, LabelledDataPoint,
    LearningError, Network, ProblemSpecification, TrainConfig, Trainer,
};

fn main() -> gradient_nn::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut network = Network::new(&[
        (2, ActivationFunction::Linear),
        (4, ActivationFunction::Tanh),
        (1, ActivationFunction::Sigmoid),
    ])?;

    let points = vec![
        LabelledDataPoint::from_slices(&[1.0, 0.0], &[1.0])?,
        LabelledDataPoint::from_slices(&[1.0, 1.0], &[0.0])?,
        LabelledDataPoint::from_slices(&[0.0, 1.0], &[1.0])?,
        LabelledDataPoint::from_slices(&[0.0, 0.0], &[0.0])?,
    ];
    let mut data = Dataset::new(points.clone()).shuffled();

    let learning_error = LearningError::mean_squared();
    let problem = ProblemSpecification::regression(2, 1, learning_error);

    let mut config = TrainConfig::new(5000, 2);
    config.seed = Some(7);
    let mut trainer = Trainer::new(GradientDescent::new(GradientDescentOptions::momentum(0.5, 0.9)), config);

    let summary = trainer.train(&problem, &mut network, &mut data, &learning_error, None)?;
    println!("Trained {} epochs, final cost = {:.6}", summary.epochs_completed, summary.last_epoch_cost.unwrap_or(f64::NAN));

    for point in &points {
        let output = network.forward(&point.input)?;
        println!("Input: {:?} -> Output: {:.4}", point.input.to_vec(), output.get(0, 0)?);
    }

    let report = evaluate(&problem, &mut network, &points)?;
    println!("Mean cost on the truth table: {:.6}", report.mean_cost);
    Ok(())
}
