use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the trainer can report.
///
/// All errors are local to the operation that raised them: nothing is
/// retried and a failed batch aborts the whole `train` call.
#[derive(Error, Debug)]
pub enum Error {
    /// Matrix dimensions disagree with what an operation requires.
    #[error("shape mismatch in {op}: expected {expected}, found {found}")]
    Shape {
        op: &'static str,
        expected: String,
        found: String,
    },

    /// A node, row, column or layer index is out of range.
    #[error("{what} index {index} is out of range (len {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// State a step depends on has not been produced yet.
    #[error("invalid state: {0}")]
    State(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn shape(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self {
        Error::Shape {
            op,
            expected: format!("{}x{}", expected.0, expected.1),
            found: format!("{}x{}", found.0, found.1),
        }
    }

    pub(crate) fn index(what: &'static str, index: usize, len: usize) -> Self {
        Error::Index { what, index, len }
    }

    /// True for dimension or index problems, which always point at a
    /// caller bug rather than bad hyperparameters.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Shape { .. } | Error::Index { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_display() {
        let err = Error::shape("multiply", (3, 2), (4, 1));
        assert_eq!(
            err.to_string(),
            "shape mismatch in multiply: expected 3x2, found 4x1"
        );
        assert!(err.is_precondition());
    }

    #[test]
    fn index_error_display() {
        let err = Error::index("layer", 0, 3);
        assert_eq!(err.to_string(), "layer index 0 is out of range (len 3)");
    }

    #[test]
    fn state_error_is_not_a_precondition() {
        assert!(!Error::State("no forward pass".into()).is_precondition());
    }
}
