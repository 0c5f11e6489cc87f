pub mod backprop;
pub mod epoch_stats;
pub mod gradient_data;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use backprop::{accumulate_gradients, backpropagate, set_hidden_layer_differential, set_output_layer_differential};
pub use epoch_stats::{EpochStats, TrainingSummary};
pub use gradient_data::GradientData;
pub use train_config::TrainConfig;
pub use trainer::Trainer;
