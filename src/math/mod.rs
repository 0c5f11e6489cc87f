pub mod matrix;
pub mod mutable;

pub use matrix::Matrix;
pub use mutable::MutableMatrix;
