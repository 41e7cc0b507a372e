//! Domain services

pub mod model_client;
pub mod prompt_composer;

pub use model_client::*;
pub use prompt_composer::{compose, compose_enhancement};
