//! Domain entities

mod ai_settings;
mod learning_example;
mod material;
mod processing_history;
mod processing_result;

pub use ai_settings::*;
pub use learning_example::*;
pub use material::{Material, MaterialInput, MaterialPatch, NewMaterial};
pub use processing_history::*;
pub use processing_result::*;
