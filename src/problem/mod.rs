pub mod encoding;
pub mod problem;
pub mod report;

pub use encoding::{argmax, OneHot};
pub use problem::{ProblemKind, ProblemSpecification};
pub use report::{evaluate, ClassificationReport, EvaluationReport};
