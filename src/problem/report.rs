use serde::{Serialize, Deserialize};

use crate::data::{batch::to_matrices, point::LabelledDataPoint};
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::problem::encoding::argmax;
use crate::problem::problem::ProblemSpecification;
use crate::train::trainer::Trainer;

/// Outcome of running a network over labelled data without training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub samples: usize,
    /// Mean per-point cost under the problem's learning error.
    pub mean_cost: f64,
    /// Present for classification problems only.
    pub classification: Option<ClassificationReport>,
}

/// Confusion matrix and the scores derived from it.
///
/// `confusion[expected][predicted]` counts data points; a point's class is
/// the argmax of its label column and its prediction the argmax of the
/// network output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub labels: Vec<String>,
    pub confusion: Vec<Vec<usize>>,
    pub accuracy: f64,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

impl ClassificationReport {
    pub fn from_confusion(labels: Vec<String>, confusion: Vec<Vec<usize>>) -> Result<ClassificationReport> {
        let n = labels.len();
        if confusion.len() != n || confusion.iter().any(|row| row.len() != n) {
            return Err(Error::Shape {
                op: "confusion matrix",
                expected: format!("{n}x{n}"),
                found: format!("{} rows", confusion.len()),
            });
        }

        let total: usize = confusion.iter().flatten().sum();
        let correct: usize = (0..n).map(|k| confusion[k][k]).sum();

        let mut precision = Vec::with_capacity(n);
        let mut recall = Vec::with_capacity(n);
        let mut f1 = Vec::with_capacity(n);
        for k in 0..n {
            let tp = confusion[k][k] as f64;
            let predicted: usize = (0..n).map(|i| confusion[i][k]).sum();
            let actual: usize = confusion[k].iter().sum();
            let p = ratio(tp, predicted as f64);
            let r = ratio(tp, actual as f64);
            precision.push(p);
            recall.push(r);
            f1.push(ratio(2.0 * p * r, p + r));
        }

        Ok(ClassificationReport {
            accuracy: ratio(correct as f64, total as f64),
            macro_precision: mean(&precision),
            macro_recall: mean(&recall),
            macro_f1: mean(&f1),
            labels,
            confusion,
            precision,
            recall,
            f1,
        })
    }
}

/// Runs `network` over `data` (one batched forward pass) and scores it
/// against `problem`.
pub fn evaluate(
    problem: &ProblemSpecification,
    network: &mut Network,
    data: &[LabelledDataPoint],
) -> Result<EvaluationReport> {
    problem.validate_network(network)?;
    if data.is_empty() {
        return Err(Error::InvalidOptions("cannot evaluate on an empty dataset".into()));
    }

    let (inputs, expected) = to_matrices(data)?;
    let actual = network.forward(&inputs)?.clone();
    let mean_cost = Trainer::calculate_cost(&problem.learning_error, &actual, &expected)?;

    let classification = match problem.class_labels() {
        None => None,
        Some(labels) => {
            let n = labels.len();
            let mut confusion = vec![vec![0; n]; n];
            for j in 0..data.len() {
                let e = argmax(&expected.column_at(j)?)?;
                let p = argmax(&actual.column_at(j)?)?;
                confusion[e][p] += 1;
            }
            Some(ClassificationReport::from_confusion(labels.to_vec(), confusion)?)
        }
    };

    Ok(EvaluationReport { samples: data.len(), mean_cost, classification })
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}
