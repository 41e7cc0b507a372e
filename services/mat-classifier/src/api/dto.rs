//! HTTP 请求与响应结构（camelCase）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::value_objects::{
    ClassificationGroups, ExamplePair, MlClassification, Specification,
};

// ========== 请求 ==========

/// 物料字段；必填项缺失时由命令校验给出字段错误
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInputDto {
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub basic_description: Option<String>,
    #[serde(default)]
    pub technical_specs: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub primary_group: Option<String>,
    #[serde(default)]
    pub secondary_group: Option<String>,
    #[serde(default)]
    pub tertiary_group: Option<String>,
}

/// 部分配置；数值字段同时接受数字与字符串
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverridesDto {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub top_p: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub top_k: Option<String>,
    #[serde(default)]
    pub erp_system: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub short_desc_limit: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub long_desc_limit: Option<String>,
    #[serde(default)]
    pub learning_mode: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<ExamplePair>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(|v| match v {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    }))
}

/// `POST /api/process-material` 请求体：物料字段与配置覆盖平铺在同一层
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMaterialRequest {
    #[serde(flatten)]
    pub material: MaterialInputDto,
    #[serde(flatten)]
    pub settings: SettingsOverridesDto,
    #[serde(default, alias = "enableAdvancedML")]
    pub enable_advanced_ml: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    #[serde(flatten)]
    pub material: MaterialInputDto,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub specifications: Option<Vec<Specification>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningExampleRequest {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

// ========== 响应 ==========

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
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
    pub specifications: Vec<Specification>,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResultDto {
    pub id: i32,
    pub material_id: i32,
    pub short_description: String,
    pub long_description: String,
    pub specifications: Vec<Specification>,
    pub classification_groups: ClassificationGroups,
    pub processed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_classification: Option<MlClassification>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedMaterialDto {
    pub material: MaterialDto,
    pub processing_result: ProcessingResultDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDetailDto {
    pub material: MaterialDto,
    pub processing_result: Option<ProcessingResultDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingHistoryDto {
    pub id: i32,
    pub batch_id: Option<String>,
    pub material_count: i32,
    pub successful: i32,
    pub failed: i32,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettingsDto {
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
    pub examples: Vec<ExamplePair>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningExampleDto {
    pub id: i32,
    pub input: String,
    pub output: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRowErrorDto {
    pub row_number: usize,
    pub row: CsvRowDto,
    pub error: String,
}

/// 失败行的原始 CSV 内容，字段名与 CSV 表头一致
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRowDto {
    pub material_name: String,
    pub material_type: String,
    pub material_id: String,
    pub basic_description: String,
    pub technical_specs: String,
    pub manufacturer: String,
    pub model_number: String,
    pub primary_group: String,
    pub secondary_group: String,
    pub tertiary_group: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponseDto {
    pub batch_id: String,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProcessedMaterialDto>,
    pub errors: Vec<BatchRowErrorDto>,
}
