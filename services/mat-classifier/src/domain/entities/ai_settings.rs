//! AI 配置

use matc_errors::{AppError, AppResult, FieldError};

use super::material::non_empty;
use crate::domain::value_objects::{ExamplePair, LearningMode, SettingsId};

/// 支持的模型供应商
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "deepseek"];

/// 模型与提示词参数
///
/// temperature / top-p / top-k 以文本形式保存，调用模型前再解析
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsProfile {
    pub provider: String,
    /// 为空时使用供应商的默认模型
    pub model: String,
    pub temperature: String,
    pub top_p: String,
    /// 仅保存；OpenAI 兼容接口没有 top-k 参数
    pub top_k: String,
    pub erp_system: String,
    pub short_desc_limit: i32,
    pub long_desc_limit: i32,
    pub learning_mode: LearningMode,
    pub additional_context: Option<String>,
    pub examples: Vec<ExamplePair>,
    pub user_id: Option<i32>,
}

impl Default for SettingsProfile {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            temperature: "0.7".to_string(),
            top_p: "0.9".to_string(),
            top_k: "40".to_string(),
            erp_system: "sap".to_string(),
            short_desc_limit: 40,
            long_desc_limit: 1000,
            learning_mode: LearningMode::None,
            additional_context: None,
            examples: Vec::new(),
            user_id: None,
        }
    }
}

/// 已持久化的配置
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub id: SettingsId,
    pub profile: SettingsProfile,
}

impl AiSettings {
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        self.profile.apply_overrides(overrides);
    }
}

/// 部分配置覆盖，`None` 表示保持原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<String>,
    pub top_p: Option<String>,
    pub top_k: Option<String>,
    pub erp_system: Option<String>,
    pub short_desc_limit: Option<i32>,
    pub long_desc_limit: Option<i32>,
    pub learning_mode: Option<LearningMode>,
    /// 空字符串清空附加上下文
    pub additional_context: Option<String>,
    pub examples: Option<Vec<ExamplePair>>,
}

/// 解析后的采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
}

impl SettingsProfile {
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(v) = overrides.provider {
            let provider = v.trim().to_ascii_lowercase();
            // 切换服务商且未指定模型时清空模型，调用时使用新服务商的默认模型
            if provider != self.provider && overrides.model.is_none() {
                self.model.clear();
            }
            self.provider = provider;
        }
        if let Some(v) = overrides.model {
            self.model = v.trim().to_string();
        }
        if let Some(v) = overrides.temperature {
            self.temperature = v.trim().to_string();
        }
        if let Some(v) = overrides.top_p {
            self.top_p = v.trim().to_string();
        }
        if let Some(v) = overrides.top_k {
            self.top_k = v.trim().to_string();
        }
        if let Some(v) = overrides.erp_system {
            self.erp_system = v.trim().to_string();
        }
        if let Some(v) = overrides.short_desc_limit {
            self.short_desc_limit = v;
        }
        if let Some(v) = overrides.long_desc_limit {
            self.long_desc_limit = v;
        }
        if let Some(v) = overrides.learning_mode {
            self.learning_mode = v;
        }
        if overrides.additional_context.is_some() {
            self.additional_context = non_empty(overrides.additional_context);
        }
        if let Some(v) = overrides.examples {
            self.examples = v;
        }
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.apply_overrides(overrides);
        self
    }

    /// 校验所有字段，返回全部字段错误
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if !KNOWN_PROVIDERS.contains(&self.provider.trim().to_ascii_lowercase().as_str()) {
            errors.push(FieldError::new(
                "provider",
                format!("unknown provider '{}', expected one of {}", self.provider, KNOWN_PROVIDERS.join(", ")),
            ));
        }
        if let Err(e) = parse_decimal("temperature", &self.temperature, 0.0, 2.0) {
            errors.push(e);
        }
        if let Err(e) = parse_decimal("topP", &self.top_p, 0.0, 1.0) {
            errors.push(e);
        }
        if self.top_k.trim().parse::<u32>().is_err() {
            errors.push(FieldError::new("topK", "must be a non-negative integer"));
        }
        if self.erp_system.trim().is_empty() {
            errors.push(FieldError::new("erpSystem", "must not be empty"));
        }
        if self.short_desc_limit <= 0 {
            errors.push(FieldError::new("shortDescLimit", "must be greater than 0"));
        }
        if self.long_desc_limit <= 0 {
            errors.push(FieldError::new("longDescLimit", "must be greater than 0"));
        }
        for (i, example) in self.examples.iter().enumerate() {
            if example.input.trim().is_empty() || example.output.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("examples[{}]", i),
                    "input and output must not be empty",
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(errors))
        }
    }

    /// 解析 temperature 与 top-p
    pub fn sampling(&self) -> AppResult<SamplingParams> {
        let temperature = parse_decimal("temperature", &self.temperature, 0.0, 2.0);
        let top_p = parse_decimal("topP", &self.top_p, 0.0, 1.0);

        match (temperature, top_p) {
            (Ok(temperature), Ok(top_p)) => Ok(SamplingParams { temperature, top_p }),
            (t, p) => Err(AppError::invalid_fields(
                [t.err(), p.err()].into_iter().flatten().collect(),
            )),
        }
    }

    /// 参与提示词的示例：`none` 不使用，其余模式按顺序使用全部示例
    pub fn prompt_examples(&self) -> &[ExamplePair] {
        match self.learning_mode {
            LearningMode::None => &[],
            LearningMode::OneShot | LearningMode::MultiShot => &self.examples,
        }
    }
}

fn parse_decimal(field: &str, raw: &str, min: f32, max: f32) -> Result<f32, FieldError> {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && (min..=max).contains(&v) => Ok(v),
        Ok(_) => Err(FieldError::new(field, format!("must be between {} and {}", min, max))),
        Err(_) => Err(FieldError::new(field, format!("'{}' is not a number", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(n: usize) -> Vec<ExamplePair> {
        (0..n)
            .map(|i| ExamplePair::new(format!("in {}", i), format!("out {}", i)))
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let profile = SettingsProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.provider, "openai");
        assert_eq!(profile.model, "gpt-4o");
        assert_eq!(profile.erp_system, "sap");
        assert_eq!((profile.short_desc_limit, profile.long_desc_limit), (40, 1000));
        assert_eq!(profile.learning_mode, LearningMode::None);
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let profile = SettingsProfile::default().with_overrides(SettingsOverrides {
            temperature: Some(" 0.2 ".to_string()),
            erp_system: Some("oracle".to_string()),
            learning_mode: Some(LearningMode::MultiShot),
            examples: Some(examples(2)),
            ..Default::default()
        });

        assert_eq!(profile.temperature, "0.2");
        assert_eq!(profile.erp_system, "oracle");
        assert_eq!(profile.top_p, "0.9");
        assert_eq!(profile.examples.len(), 2);
    }

    #[test]
    fn test_provider_switch_resets_model() {
        let switched = SettingsProfile::default().with_overrides(SettingsOverrides {
            provider: Some("DeepSeek".to_string()),
            ..Default::default()
        });
        assert_eq!(switched.provider, "deepseek");
        assert_eq!(switched.model, "");

        let explicit = SettingsProfile::default().with_overrides(SettingsOverrides {
            provider: Some("deepseek".to_string()),
            model: Some("deepseek-reasoner".to_string()),
            ..Default::default()
        });
        assert_eq!(explicit.model, "deepseek-reasoner");

        let same = SettingsProfile::default().with_overrides(SettingsOverrides {
            provider: Some(" openai ".to_string()),
            ..Default::default()
        });
        assert_eq!(same.model, "gpt-4o");
    }

    #[test]
    fn test_empty_additional_context_clears() {
        let mut settings = AiSettings {
            id: SettingsId(1),
            profile: SettingsProfile {
                additional_context: Some("Use ISO units".to_string()),
                ..Default::default()
            },
        };

        settings.apply_overrides(SettingsOverrides::default());
        assert_eq!(settings.profile.additional_context.as_deref(), Some("Use ISO units"));

        settings.apply_overrides(SettingsOverrides {
            additional_context: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(settings.profile.additional_context, None);
    }

    #[test]
    fn test_validate_collects_every_field_error() {
        let profile = SettingsProfile {
            provider: "anthropic".to_string(),
            temperature: "hot".to_string(),
            top_p: "1.5".to_string(),
            short_desc_limit: 0,
            ..Default::default()
        };

        match profile.validate() {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["provider", "temperature", "topP", "shortDescLimit"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_sampling_parses_text_values() {
        let params = SettingsProfile::default().sampling().unwrap();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.9);
    }

    #[test]
    fn test_prompt_examples_by_mode() {
        let mut profile = SettingsProfile {
            examples: examples(3),
            ..Default::default()
        };
        assert!(profile.prompt_examples().is_empty());

        profile.learning_mode = LearningMode::OneShot;
        assert_eq!(profile.prompt_examples(), profile.examples.as_slice());

        profile.learning_mode = LearningMode::MultiShot;
        assert_eq!(profile.prompt_examples().len(), 3);

        profile.examples.clear();
        profile.learning_mode = LearningMode::OneShot;
        assert!(profile.prompt_examples().is_empty());
    }
}
