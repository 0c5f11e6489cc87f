pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod init;
pub mod layers;
pub mod network;
pub mod data;
pub mod optim;
pub mod train;
pub mod problem;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use math::mutable::MutableMatrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use loss::{LearningError, NodeCost, Reduction};
pub use data::{DataSource, Dataset, GeneratedSource, LabelledDataPoint};
pub use optim::{GradientDescent, GradientDescentOptions, OptionsOverride};
pub use train::{EpochStats, GradientData, TrainConfig, Trainer, TrainingSummary};
pub use problem::{evaluate, EvaluationReport, OneHot, ProblemKind, ProblemSpecification};
