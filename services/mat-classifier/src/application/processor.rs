//! 物料处理：组装提示词 → 调用模型 → 解析回复

use std::sync::Arc;
use std::time::Instant;

use matc_errors::{AppError, AppResult};
use metrics::histogram;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::{MaterialInput, SettingsProfile};
use crate::domain::services::{CompletionRequest, ModelClient, compose, compose_enhancement};
use crate::domain::value_objects::{ClassificationGroups, MlClassification, Specification};

/// 增强分析固定使用的 temperature
pub const ENHANCEMENT_TEMPERATURE: f32 = 0.2;

/// 解析后的模型输出
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub short_description: String,
    pub long_description: String,
    pub classification_groups: ClassificationGroups,
    pub specifications: Vec<Specification>,
    /// 仅在启用增强分析时存在
    pub ml_classification: Option<MlClassification>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    short_description: String,
    long_description: String,
    classification_groups: ClassificationGroups,
    #[serde(default)]
    specifications: Option<Vec<Specification>>,
}

/// 解析主处理回复
pub fn parse_model_output(content: &str) -> AppResult<ModelOutput> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::model_response("Empty response from model"));
    }

    let reply: ModelReply = serde_json::from_str(content)
        .map_err(|e| AppError::model_response(format!("Malformed model reply: {}", e)))?;

    Ok(ModelOutput {
        short_description: reply.short_description,
        long_description: reply.long_description,
        classification_groups: reply.classification_groups,
        specifications: reply.specifications.unwrap_or_default(),
        ml_classification: None,
    })
}

/// 解析增强分析回复
pub fn parse_ml_classification(content: &str) -> AppResult<MlClassification> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::model_response(
            "Empty response from model for advanced classification",
        ));
    }
    serde_json::from_str(content).map_err(|e| {
        AppError::model_response(format!("Malformed advanced classification reply: {}", e))
    })
}

pub struct MaterialProcessor {
    client: Arc<dyn ModelClient>,
}

impl MaterialProcessor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// 处理单条物料，不做持久化
    ///
    /// 增强分析失败时使用降级结果，不影响主结果
    pub async fn process(
        &self,
        input: &MaterialInput,
        settings: &SettingsProfile,
        enable_advanced_ml: bool,
    ) -> AppResult<ModelOutput> {
        let sampling = settings.sampling()?;

        let request = CompletionRequest {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            messages: compose(input, settings),
            temperature: sampling.temperature,
            top_p: Some(sampling.top_p),
        };
        debug!(
            provider = %request.provider,
            messages = request.messages.len(),
            "Sending material to model"
        );

        let content = self.call("primary", request).await?;
        let mut output = parse_model_output(&content)?;

        if enable_advanced_ml {
            output.ml_classification = Some(self.enhance(input, settings, &output).await);
        }

        Ok(output)
    }

    async fn enhance(
        &self,
        input: &MaterialInput,
        settings: &SettingsProfile,
        output: &ModelOutput,
    ) -> MlClassification {
        match self.try_enhance(input, settings, output).await {
            Ok(ml) => ml,
            Err(e) => {
                warn!(
                    material_name = %input.material_name,
                    error = %e,
                    "Advanced classification failed, using degraded result"
                );
                MlClassification::degraded()
            }
        }
    }

    async fn try_enhance(
        &self,
        input: &MaterialInput,
        settings: &SettingsProfile,
        output: &ModelOutput,
    ) -> AppResult<MlClassification> {
        let request = CompletionRequest {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            messages: compose_enhancement(input, &output.classification_groups, &output.specifications)?,
            temperature: ENHANCEMENT_TEMPERATURE,
            top_p: None,
        };

        let content = self.call("enhancement", request).await?;
        parse_ml_classification(&content)
    }

    async fn call(&self, kind: &'static str, request: CompletionRequest) -> AppResult<String> {
        let provider = request.provider.clone();
        let started = Instant::now();
        let result = self.client.complete(request).await;

        histogram!(
            "model_request_duration_seconds",
            "provider" => provider,
            "kind" => kind,
            "success" => if result.is_ok() { "true" } else { "false" },
        )
        .record(started.elapsed().as_secs_f64());

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let output = parse_model_output(
            r#"{
                "shortDescription": "MOTOR,AC,3-PH,15KW",
                "longDescription": "Three phase AC motor, 15 kW, 400 V, IP55",
                "classificationGroups": {"primaryGroup": "electrical", "secondaryGroup": "motor"},
                "specifications": [{"attribute": "Power", "value": "15", "unit": "kW"}]
            }"#,
        )
        .unwrap();

        assert_eq!(output.short_description, "MOTOR,AC,3-PH,15KW");
        assert_eq!(output.classification_groups.secondary_group.as_deref(), Some("motor"));
        assert_eq!(output.classification_groups.tertiary_group, None);
        assert_eq!(output.specifications[0].unit.as_deref(), Some("kW"));
        assert!(output.ml_classification.is_none());
    }

    #[test]
    fn test_parse_without_specifications() {
        let output = parse_model_output(
            r#"{"shortDescription":"S","longDescription":"L","classificationGroups":{"primaryGroup":"p"},"specifications":null}"#,
        )
        .unwrap();
        assert!(output.specifications.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(matches!(parse_model_output("  "), Err(AppError::ModelResponse(_))));
        assert!(matches!(parse_model_output("not json"), Err(AppError::ModelResponse(_))));
        assert!(matches!(
            parse_model_output(r#"{"shortDescription":"S"}"#),
            Err(AppError::ModelResponse(_))
        ));
    }

    #[test]
    fn test_parse_ml_classification_fills_missing_lists() {
        let ml = parse_ml_classification(r#"{"confidence": 0.92, "keyAttributes": ["power"]}"#).unwrap();
        assert_eq!(ml.confidence, 0.92);
        assert_eq!(ml.key_attributes, vec!["power"]);
        assert!(ml.alternative_classifications.is_empty());
        assert!(ml.similar_materials.is_empty());
    }
}
