//! Line item calculation, invoice aggregation and the engine tying them together

pub mod engine;
pub mod invoice;
pub mod line_item;

pub use engine::*;
pub use invoice::*;
pub use line_item::*;
