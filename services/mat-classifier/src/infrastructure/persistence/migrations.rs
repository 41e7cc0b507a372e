//! 数据库结构迁移

use matc_adapter_postgres::Migration;

const CREATE_MATERIALS: &str = r#"
CREATE TABLE IF NOT EXISTS materials (
    id SERIAL PRIMARY KEY,
    material_id TEXT,
    material_name TEXT NOT NULL,
    material_type TEXT NOT NULL,
    basic_description TEXT NOT NULL,
    technical_specs TEXT,
    manufacturer TEXT,
    model_number TEXT,
    primary_group TEXT NOT NULL,
    secondary_group TEXT,
    tertiary_group TEXT,
    short_description TEXT,
    long_description TEXT,
    specifications JSONB,
    processed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    user_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_materials_processed_at ON materials (processed_at DESC);

CREATE TABLE IF NOT EXISTS processing_results (
    id SERIAL PRIMARY KEY,
    material_id INTEGER NOT NULL UNIQUE REFERENCES materials (id) ON DELETE CASCADE,
    short_description TEXT NOT NULL,
    long_description TEXT NOT NULL,
    specifications JSONB,
    classification_groups JSONB NOT NULL,
    processed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

const CREATE_PROCESSING_HISTORY: &str = r#"
CREATE TABLE IF NOT EXISTS processing_history (
    id SERIAL PRIMARY KEY,
    batch_id TEXT,
    material_count INTEGER NOT NULL,
    successful INTEGER NOT NULL,
    failed INTEGER NOT NULL,
    processed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    user_id INTEGER,
    CONSTRAINT processing_history_counts CHECK (
        successful >= 0 AND failed >= 0 AND successful + failed = material_count
    )
);

CREATE INDEX IF NOT EXISTS idx_processing_history_processed_at ON processing_history (processed_at DESC);
"#;

const CREATE_SETTINGS_AND_EXAMPLES: &str = r#"
CREATE TABLE IF NOT EXISTS ai_settings (
    id SERIAL PRIMARY KEY,
    provider TEXT NOT NULL,
    model TEXT NOT NULL,
    temperature TEXT NOT NULL,
    top_p TEXT NOT NULL,
    top_k TEXT NOT NULL,
    erp_system TEXT NOT NULL,
    short_desc_limit INTEGER NOT NULL,
    long_desc_limit INTEGER NOT NULL,
    learning_mode TEXT NOT NULL,
    additional_context TEXT,
    examples JSONB,
    user_id INTEGER
);

CREATE TABLE IF NOT EXISTS learning_examples (
    id SERIAL PRIMARY KEY,
    input TEXT NOT NULL,
    output TEXT NOT NULL,
    user_id INTEGER
);
"#;

/// 服务的全部迁移，按版本递增
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_materials_and_results", CREATE_MATERIALS),
        Migration::new(2, "create_processing_history", CREATE_PROCESSING_HISTORY),
        Migration::new(3, "create_ai_settings_and_learning_examples", CREATE_SETTINGS_AND_EXAMPLES),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_unique_and_ordered() {
        let versions: Vec<i64> = migrations().iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_results_cascade_with_materials() {
        assert!(CREATE_MATERIALS.contains("REFERENCES materials (id) ON DELETE CASCADE"));
        assert!(CREATE_PROCESSING_HISTORY.contains("successful + failed = material_count"));
    }
}
