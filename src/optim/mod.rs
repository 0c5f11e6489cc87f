pub mod gradient_descent;
pub mod options;

pub use gradient_descent::GradientDescent;
pub use options::{GradientDescentOptions, OptionsOverride};
