//! 批量上传的 multipart 解析

use axum::extract::Multipart;
use matc_errors::{AppError, AppResult};
use tracing::debug;

use super::dto::SettingsOverridesDto;
use crate::domain::value_objects::ExamplePair;

/// 上传内容：CSV 文件与随附的配置字段
#[derive(Debug, Default)]
pub struct BatchUpload {
    pub csv: Vec<u8>,
    pub settings: SettingsOverridesDto,
    pub enable_advanced_ml: bool,
}

pub async fn read_batch_upload(mut multipart: Multipart) -> AppResult<BatchUpload> {
    let mut upload = BatchUpload::default();
    let mut csv = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read uploaded file: {}", e)))?;
            csv = Some(bytes.to_vec());
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read field '{}': {}", name, e)))?;
            apply_text_field(&mut upload, &name, value)?;
        }
    }

    upload.csv = csv.ok_or_else(|| AppError::validation("No file uploaded"))?;
    Ok(upload)
}

/// 应用一个文本字段；空值视为未提供，附加上下文除外（空值清空）
pub(crate) fn apply_text_field(upload: &mut BatchUpload, name: &str, value: String) -> AppResult<()> {
    let settings = &mut upload.settings;

    if name == "additionalContext" {
        settings.additional_context = Some(value);
        return Ok(());
    }
    if value.trim().is_empty() {
        return Ok(());
    }

    match name {
        "provider" => settings.provider = Some(value),
        "model" => settings.model = Some(value),
        "temperature" => settings.temperature = Some(value),
        "topP" => settings.top_p = Some(value),
        "topK" => settings.top_k = Some(value),
        "erpSystem" => settings.erp_system = Some(value),
        "shortDescLimit" => settings.short_desc_limit = Some(value),
        "longDescLimit" => settings.long_desc_limit = Some(value),
        "learningMode" => settings.learning_mode = Some(value),
        "examples" => {
            let examples: Vec<ExamplePair> = serde_json::from_str(&value).map_err(|e| {
                AppError::validation(format!(
                    "Field 'examples' must be a JSON array of {{input, output}}: {}",
                    e
                ))
            })?;
            settings.examples = Some(examples);
        }
        "enableAdvancedMl" | "enableAdvancedML" => {
            upload.enable_advanced_ml =
                matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes");
        }
        other => debug!(field = other, "Ignoring unknown multipart field"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(upload: &mut BatchUpload, name: &str, value: &str) -> AppResult<()> {
        apply_text_field(upload, name, value.to_string())
    }

    #[test]
    fn test_settings_fields() {
        let mut upload = BatchUpload::default();
        apply(&mut upload, "temperature", "0.4").unwrap();
        apply(&mut upload, "learningMode", "one-shot").unwrap();
        apply(&mut upload, "enableAdvancedML", "true").unwrap();
        apply(&mut upload, "examples", r#"[{"input":"a","output":"b"}]"#).unwrap();
        apply(&mut upload, "somethingElse", "x").unwrap();

        assert_eq!(upload.settings.temperature.as_deref(), Some("0.4"));
        assert_eq!(upload.settings.learning_mode.as_deref(), Some("one-shot"));
        assert!(upload.enable_advanced_ml);
        assert_eq!(upload.settings.examples.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_values_are_ignored_except_context() {
        let mut upload = BatchUpload::default();
        apply(&mut upload, "topP", "  ").unwrap();
        apply(&mut upload, "additionalContext", "").unwrap();

        assert!(upload.settings.top_p.is_none());
        assert_eq!(upload.settings.additional_context.as_deref(), Some(""));
    }

    #[test]
    fn test_malformed_examples_rejected() {
        let mut upload = BatchUpload::default();
        let err = apply(&mut upload, "examples", "not json").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
