pub mod absolute_error;
pub mod bce;
pub mod cross_entropy;
pub mod huber;
pub mod learning_error;
pub mod node_cost;
pub mod reduction;
pub mod squared_error;

pub use learning_error::LearningError;
pub use node_cost::NodeCost;
pub use reduction::Reduction;
