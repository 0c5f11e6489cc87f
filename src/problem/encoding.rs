use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Index of the largest entry of a column; ties go to the lowest index.
pub fn argmax(column: &Matrix) -> Result<usize> {
    if !column.is_column() {
        return Err(Error::shape("argmax", (column.rows(), 1), column.shape()));
    }
    let mut best = 0;
    for (i, v) in column.iter().enumerate() {
        if v > column.at(best, 0) {
            best = i;
        }
    }
    Ok(best)
}

/// One-hot encoding over a fixed list of class labels: label `k` becomes a
/// column with a single `1.0` at row `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHot {
    labels: Vec<String>,
}

impl OneHot {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<OneHot> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::InvalidOptions("one-hot encoding needs at least one label".into()));
        }
        Ok(OneHot { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| Error::InvalidOptions(format!("unknown class label `{label}`")))
    }

    pub fn encode(&self, label: &str) -> Result<Matrix> {
        self.encode_index(self.index_of(label)?)
    }

    pub fn encode_index(&self, index: usize) -> Result<Matrix> {
        if index >= self.labels.len() {
            return Err(Error::index("class", index, self.labels.len()));
        }
        let mut values = vec![0.0; self.labels.len()];
        values[index] = 1.0;
        Matrix::column(values)
    }

    /// The label of the first row holding exactly `1.0`, if any.
    pub fn decode(&self, column: &Matrix) -> Option<&str> {
        if column.shape() != (self.labels.len(), 1) {
            return None;
        }
        column
            .iter()
            .position(|v| v == 1.0)
            .map(|i| self.labels[i].as_str())
    }

    /// The label of the strongest output node.
    pub fn predict(&self, column: &Matrix) -> Result<&str> {
        if column.shape() != (self.labels.len(), 1) {
            return Err(Error::shape("predict", (self.labels.len(), 1), column.shape()));
        }
        Ok(&self.labels[argmax(column)?])
    }
}
