//! Value objects

mod classification;
mod ids;
mod learning;
mod specification;

pub use classification::*;
pub use ids::*;
pub use learning::*;
pub use specification::*;
