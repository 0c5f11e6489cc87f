use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Hyperparameters of the gradient-descent family.
///
/// ```json
/// { "kind": "momentum", "learning_rate": 0.1, "momentum": 0.9 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradientDescentOptions {
    /// `w ← w − η·g`
    Plain { learning_rate: f64 },
    /// `v ← μ·v − η·g; w ← w + v`, for weights and biases alike.
    Momentum { learning_rate: f64, momentum: f64 },
    /// L2 weight decay: `w ← (1 − η·λ)·w − η·g`. Biases are not decayed.
    Regularized { learning_rate: f64, regularization: f64 },
}

/// Per-call replacement values, applied field by field on top of the
/// stored options. A field the stored variant does not carry is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsOverride {
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub momentum: Option<f64>,
    #[serde(default)]
    pub regularization: Option<f64>,
}

impl GradientDescentOptions {
    pub fn plain(learning_rate: f64) -> Self {
        GradientDescentOptions::Plain { learning_rate }
    }

    pub fn momentum(learning_rate: f64, momentum: f64) -> Self {
        GradientDescentOptions::Momentum { learning_rate, momentum }
    }

    pub fn regularized(learning_rate: f64, regularization: f64) -> Self {
        GradientDescentOptions::Regularized { learning_rate, regularization }
    }

    pub fn learning_rate(&self) -> f64 {
        match *self {
            GradientDescentOptions::Plain { learning_rate }
            | GradientDescentOptions::Momentum { learning_rate, .. }
            | GradientDescentOptions::Regularized { learning_rate, .. } => learning_rate,
        }
    }

    pub fn momentum_factor(&self) -> Option<f64> {
        match *self {
            GradientDescentOptions::Momentum { momentum, .. } => Some(momentum),
            _ => None,
        }
    }

    pub fn regularization_factor(&self) -> Option<f64> {
        match *self {
            GradientDescentOptions::Regularized { regularization, .. } => Some(regularization),
            _ => None,
        }
    }

    /// Rejects negative or non-finite hyperparameters.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("learning_rate", self.learning_rate())?;
        if let Some(m) = self.momentum_factor() {
            check_non_negative("momentum", m)?;
        }
        if let Some(r) = self.regularization_factor() {
            check_non_negative("regularization", r)?;
        }
        Ok(())
    }

    /// The options in effect for one call: `self` with every field that
    /// `overrides` supplies replaced.
    pub fn with_override(&self, overrides: Option<&OptionsOverride>) -> Result<Self> {
        let Some(o) = overrides else {
            return Ok(*self);
        };
        let merged = match *self {
            GradientDescentOptions::Plain { learning_rate } => {
                reject_field(o.momentum, "momentum", "plain")?;
                reject_field(o.regularization, "regularization", "plain")?;
                GradientDescentOptions::Plain {
                    learning_rate: o.learning_rate.unwrap_or(learning_rate),
                }
            }
            GradientDescentOptions::Momentum { learning_rate, momentum } => {
                reject_field(o.regularization, "regularization", "momentum")?;
                GradientDescentOptions::Momentum {
                    learning_rate: o.learning_rate.unwrap_or(learning_rate),
                    momentum: o.momentum.unwrap_or(momentum),
                }
            }
            GradientDescentOptions::Regularized { learning_rate, regularization } => {
                reject_field(o.momentum, "momentum", "regularized")?;
                GradientDescentOptions::Regularized {
                    learning_rate: o.learning_rate.unwrap_or(learning_rate),
                    regularization: o.regularization.unwrap_or(regularization),
                }
            }
        };
        merged.validate()?;
        Ok(merged)
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidOptions(format!("{name} must be a finite, non-negative number, got {value}")));
    }
    Ok(())
}

fn reject_field(value: Option<f64>, field: &str, variant: &str) -> Result<()> {
    if value.is_some() {
        return Err(Error::InvalidOptions(format!("{variant} gradient descent has no `{field}` to override")));
    }
    Ok(())
}
