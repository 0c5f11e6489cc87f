pub mod initializer;

pub use initializer::{initialize, initialize_with};
