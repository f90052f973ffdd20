//! Utility modules

pub mod rounding;
pub mod validation;

pub use rounding::*;
pub use validation::*;
