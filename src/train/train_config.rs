use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `Trainer::train` run.
///
/// # Fields
/// - `epochs`            — number of passes over the data source
/// - `batch_size`        — points per batch; use `1` for online descent
/// - `parallel`          — run the per-point passes of a batch on rayon workers
/// - `seed`              — seeds weight randomization only; `None` draws from
///                         entropy. Seed a shuffled `Dataset` separately with
///                         `Dataset::shuffled_with_seed`.
/// - `randomize_weights` — redraw every weight matrix before the first epoch
/// - `progress_tx`       — optional sender; one `EpochStats` per completed
///                         epoch. A dropped receiver ends training.
/// - `stop_flag`         — optional flag checked between epochs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_randomize")]
    pub randomize_weights: bool,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

fn default_randomize() -> bool {
    true
}

impl TrainConfig {
    /// Sequential, unseeded, randomizing config with no hooks attached.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            parallel: false,
            seed: None,
            randomize_weights: true,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn from_json(json: &str) -> Result<TrainConfig> {
        let config: TrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidOptions("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// RNG used for weight randomization.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn json_defaults() {
        let config = TrainConfig::from_json(r#"{ "epochs": 3, "batch_size": 8 }"#).unwrap();
        assert_eq!(config.epochs, 3);
        assert!(!config.parallel);
        assert!(config.randomize_weights);
        assert!(config.seed.is_none());
        assert!(config.progress_tx.is_none());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = TrainConfig::from_json(r#"{ "epochs": 3, "batch_size": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut config = TrainConfig::new(1, 1);
        config.seed = Some(7);
        let a: f64 = config.rng().gen();
        let b: f64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
