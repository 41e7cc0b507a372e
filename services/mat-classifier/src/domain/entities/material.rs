//! 物料实体

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{MaterialId, Specification};

/// 用户提交的物料原始信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialInput {
    /// 外部物料编号
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
}

impl MaterialInput {
    /// 去除首尾空白，空的可选字段归一为 `None`
    pub fn normalized(self) -> Self {
        Self {
            material_id: non_empty(self.material_id),
            material_name: self.material_name.trim().to_string(),
            material_type: self.material_type.trim().to_string(),
            basic_description: self.basic_description.trim().to_string(),
            technical_specs: non_empty(self.technical_specs),
            manufacturer: non_empty(self.manufacturer),
            model_number: non_empty(self.model_number),
            primary_group: self.primary_group.trim().to_string(),
            secondary_group: non_empty(self.secondary_group),
            tertiary_group: non_empty(self.tertiary_group),
        }
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 待持久化的物料
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub details: MaterialInput,
    pub short_description: String,
    pub long_description: String,
    pub specifications: Vec<Specification>,
    pub user_id: Option<i32>,
}

/// 已处理的物料
#[derive(Debug, Clone)]
pub struct Material {
    pub id: MaterialId,
    pub details: MaterialInput,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub specifications: Vec<Specification>,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

/// 物料的部分更新；可选字段传入空字符串表示清空
#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
    pub material_id: Option<String>,
    pub material_name: Option<String>,
    pub material_type: Option<String>,
    pub basic_description: Option<String>,
    pub technical_specs: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub primary_group: Option<String>,
    pub secondary_group: Option<String>,
    pub tertiary_group: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub specifications: Option<Vec<Specification>>,
}

impl Material {
    pub fn apply_patch(&mut self, patch: MaterialPatch) {
        let details = &mut self.details;

        if let Some(v) = patch.material_name {
            details.material_name = v.trim().to_string();
        }
        if let Some(v) = patch.material_type {
            details.material_type = v.trim().to_string();
        }
        if let Some(v) = patch.basic_description {
            details.basic_description = v.trim().to_string();
        }
        if let Some(v) = patch.primary_group {
            details.primary_group = v.trim().to_string();
        }
        if patch.material_id.is_some() {
            details.material_id = non_empty(patch.material_id);
        }
        if patch.technical_specs.is_some() {
            details.technical_specs = non_empty(patch.technical_specs);
        }
        if patch.manufacturer.is_some() {
            details.manufacturer = non_empty(patch.manufacturer);
        }
        if patch.model_number.is_some() {
            details.model_number = non_empty(patch.model_number);
        }
        if patch.secondary_group.is_some() {
            details.secondary_group = non_empty(patch.secondary_group);
        }
        if patch.tertiary_group.is_some() {
            details.tertiary_group = non_empty(patch.tertiary_group);
        }
        if patch.short_description.is_some() {
            self.short_description = non_empty(patch.short_description);
        }
        if patch.long_description.is_some() {
            self.long_description = non_empty(patch.long_description);
        }
        if let Some(specs) = patch.specifications {
            self.specifications = specs;
        }
    }
}
