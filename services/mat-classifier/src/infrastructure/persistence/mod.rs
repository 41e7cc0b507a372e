//! Persistence implementations

mod converters;
mod migrations;
mod postgres;
mod rows;

pub use migrations::migrations;
pub use postgres::{
    PostgresAiSettingsRepository, PostgresLearningExampleRepository, PostgresMaterialRepository,
    PostgresProcessingHistoryRepository, PostgresProcessingResultRepository,
};
