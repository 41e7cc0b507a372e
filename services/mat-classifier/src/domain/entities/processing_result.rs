//! 模型处理结果

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ClassificationGroups, MaterialId, ProcessingResultId, Specification};

#[derive(Debug, Clone)]
pub struct NewProcessingResult {
    pub material_id: MaterialId,
    pub short_description: String,
    pub long_description: String,
    pub specifications: Vec<Specification>,
    pub classification_groups: ClassificationGroups,
}

/// 与物料一一对应的原始模型输出，创建后不再修改
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub id: ProcessingResultId,
    pub material_id: MaterialId,
    pub short_description: String,
    pub long_description: String,
    pub specifications: Vec<Specification>,
    pub classification_groups: ClassificationGroups,
    pub processed_at: DateTime<Utc>,
}
