pub mod llm;
pub mod persistence;
