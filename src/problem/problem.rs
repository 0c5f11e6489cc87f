use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::loss::learning_error::LearningError;
use crate::network::network::Network;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemKind {
    Regression,
    /// One output node per label, in label order.
    Classification { class_labels: Vec<String> },
}

/// What is being learned: data dimensions, problem kind and the cost the
/// network is judged by. Read-only to the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpecification {
    pub input_size: usize,
    pub output_size: usize,
    #[serde(flatten)]
    pub kind: ProblemKind,
    #[serde(default)]
    pub learning_error: LearningError,
}

impl ProblemSpecification {
    pub fn regression(input_size: usize, output_size: usize, learning_error: LearningError) -> Self {
        ProblemSpecification { input_size, output_size, kind: ProblemKind::Regression, learning_error }
    }

    /// A classification problem with one output node per label.
    pub fn classification<S: Into<String>>(
        input_size: usize,
        class_labels: impl IntoIterator<Item = S>,
        learning_error: LearningError,
    ) -> Self {
        let class_labels: Vec<String> = class_labels.into_iter().map(Into::into).collect();
        ProblemSpecification {
            input_size,
            output_size: class_labels.len(),
            kind: ProblemKind::Classification { class_labels },
            learning_error,
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(self.kind, ProblemKind::Classification { .. })
    }

    pub fn class_labels(&self) -> Option<&[String]> {
        match &self.kind {
            ProblemKind::Classification { class_labels } => Some(class_labels),
            ProblemKind::Regression => None,
        }
    }

    /// Checks that `network` takes `input_size` values and produces
    /// `output_size`, and that a classification problem has one label per
    /// output node.
    pub fn validate_network(&self, network: &Network) -> Result<()> {
        if let Some(labels) = self.class_labels() {
            if labels.len() != self.output_size {
                return Err(Error::InvalidTopology(format!(
                    "{} class labels for {} output nodes",
                    labels.len(),
                    self.output_size
                )));
            }
        }
        if network.input_size() != self.input_size || network.output_size() != self.output_size {
            return Err(Error::InvalidTopology(format!(
                "network maps {} -> {}, problem needs {} -> {}",
                network.input_size(),
                network.output_size(),
                self.input_size,
                self.output_size
            )));
        }
        Ok(())
    }
}
