//! Application layer

pub mod batch;
pub mod commands;
pub mod handler;
pub mod processor;

pub use handler::{MaterialDetail, ProcessedMaterial, ServiceHandler};
