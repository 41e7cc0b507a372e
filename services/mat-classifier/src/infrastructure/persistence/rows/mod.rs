//! 数据库行映射结构

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// 物料数据库行
#[derive(Debug, FromRow)]
pub struct MaterialRow {
    pub id: i32,
    pub material_id: Option<String>,
    pub material_name: String,
    pub material_type: String,
    pub basic_description: String,
    pub technical_specs: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub primary_group: String,
    pub secondary_group: Option<String>,
    pub tertiary_group: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

/// 处理结果数据库行
#[derive(Debug, FromRow)]
pub struct ProcessingResultRow {
    pub id: i32,
    pub material_id: i32,
    pub short_description: String,
    pub long_description: String,
    pub specifications: Option<serde_json::Value>,
    pub classification_groups: serde_json::Value,
    pub processed_at: DateTime<Utc>,
}

/// 处理历史数据库行
#[derive(Debug, FromRow)]
pub struct ProcessingHistoryRow {
    pub id: i32,
    pub batch_id: Option<String>,
    pub material_count: i32,
    pub successful: i32,
    pub failed: i32,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

/// AI 配置数据库行
#[derive(Debug, FromRow)]
pub struct AiSettingsRow {
    pub id: i32,
    pub provider: String,
    pub model: String,
    pub temperature: String,
    pub top_p: String,
    pub top_k: String,
    pub erp_system: String,
    pub short_desc_limit: i32,
    pub long_desc_limit: i32,
    pub learning_mode: String,
    pub additional_context: Option<String>,
    pub examples: Option<serde_json::Value>,
    pub user_id: Option<i32>,
}

/// 学习样例数据库行
#[derive(Debug, FromRow)]
pub struct LearningExampleRow {
    pub id: i32,
    pub input: String,
    pub output: String,
    pub user_id: Option<i32>,
}
