use serde::{Serialize, Deserialize};

/// How a column of per-node values collapses into one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Sum,
    Mean,
}

impl Reduction {
    pub fn reduce<I>(&self, values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, n) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        match self {
            Reduction::Sum => sum,
            Reduction::Mean if n == 0 => 0.0,
            Reduction::Mean => sum / n as f64,
        }
    }
}
