//! 分类结果

use serde::{Deserialize, Serialize};

/// 三级物料分组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationGroups {
    pub primary_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_group: Option<String>,
}

/// 备选分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeClassification {
    pub primary_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_group: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

/// 增强分析结果（置信度、备选分类、关键属性、相似物料）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlClassification {
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub alternative_classifications: Vec<AlternativeClassification>,
    #[serde(default)]
    pub key_attributes: Vec<String>,
    #[serde(default)]
    pub similar_materials: Vec<String>,
}

/// 增强分析失败时使用的置信度
pub const DEGRADED_CONFIDENCE: f64 = 0.7;

fn default_confidence() -> f64 {
    DEGRADED_CONFIDENCE
}

impl MlClassification {
    /// 增强调用失败时的降级结果
    pub fn degraded() -> Self {
        Self {
            confidence: DEGRADED_CONFIDENCE,
            alternative_classifications: Vec::new(),
            key_attributes: Vec::new(),
            similar_materials: Vec::new(),
        }
    }
}
