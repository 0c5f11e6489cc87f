use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `Trainer::train`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, one value
/// is sent at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean pre-update cost over every data point seen this epoch.
    pub train_cost: f64,
    pub batches: usize,
    pub samples: usize,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// What a `train` call did before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub epochs_completed: usize,
    /// `None` if no epoch produced any data.
    pub last_epoch_cost: Option<f64>,
    /// True when the stop flag or a dropped progress receiver ended the run.
    pub stopped_early: bool,
}
