pub mod batch;
pub mod point;
pub mod source;

pub use batch::{batches, to_matrices, Batches};
pub use point::LabelledDataPoint;
pub use source::{DataSource, Dataset, GeneratedSource};
