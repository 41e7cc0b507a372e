//! OpenAI 兼容的 Chat Completions 客户端
//!
//! OpenAI 与 DeepSeek 共用同一套请求格式，按请求中的 provider 选择 base_url 与密钥。

use std::time::Duration;

use async_trait::async_trait;
use matc_config::{LlmConfig, ProviderConfig};
use matc_errors::{AppError, AppResult};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::domain::services::{ChatMessage, CompletionRequest, ModelClient};

// ============================================================================
// 请求/响应结构
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// 客户端
// ============================================================================

pub struct OpenAiCompatibleClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleClient {
    pub fn new(config: LlmConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn provider(&self, name: &str) -> AppResult<&ProviderConfig> {
        self.config
            .provider(name)
            .ok_or_else(|| AppError::validation(format!("Unknown model provider: {}", name)))
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn request_body<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
    ChatCompletionBody {
        model,
        messages: &request.messages,
        response_format: ResponseFormat {
            kind: "json_object",
        },
        temperature: request.temperature,
        top_p: request.top_p,
    }
}

fn extract_content(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::model_response("Model returned no content"))
}

/// 请求未指定模型时使用服务商默认模型
fn resolve_model<'a>(provider: &'a ProviderConfig, model: &'a str) -> &'a str {
    if model.trim().is_empty() {
        provider.default_model.as_str()
    } else {
        model
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatibleClient {
    #[instrument(skip(self, request), fields(provider = %request.provider))]
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let provider = self.provider(&request.provider)?;
        let api_key = provider.api_key.as_ref().ok_or_else(|| {
            AppError::external_service(format!(
                "API key for provider '{}' is not configured",
                request.provider
            ))
        })?;

        let model = resolve_model(provider, &request.model);

        debug!(model, messages = request.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(completions_url(&provider.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&request_body(model, &request))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Model request failed");
                AppError::external_service(format!("{} request failed: {}", request.provider, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(format!("Failed to read {} response: {}", request.provider, e))
        })?;

        if !status.is_success() {
            error!(%status, "Model provider returned an error");
            return Err(AppError::external_service(format!(
                "{} returned {}: {}",
                request.provider, status, body
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::model_response(format!("Invalid completion payload: {}", e)))?;

        extract_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            provider: "openai".to_string(),
            model: String::new(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.7,
            top_p: None,
        }
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.deepseek.com/v1"),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_serialization() {
        let req = request();
        let value = serde_json::to_value(request_body("gpt-4o", &req)).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!(value.get("top_p").is_none());
    }

    #[test]
    fn test_empty_model_falls_back_to_provider_default() {
        let config = LlmConfig::default();
        let deepseek = &config.deepseek;

        assert_eq!(resolve_model(deepseek, ""), "deepseek-chat");
        assert_eq!(resolve_model(deepseek, "  "), "deepseek-chat");
        assert_eq!(resolve_model(deepseek, "deepseek-reasoner"), "deepseek-reasoner");
    }

    #[test]
    fn test_extract_content_requires_choice() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(empty), Err(AppError::ModelResponse(_))));

        let ok: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "{\"a\":1}"}}]}"#)
                .unwrap();
        assert_eq!(extract_content(ok).unwrap(), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_unknown_provider_and_missing_key() {
        let client = OpenAiCompatibleClient::new(LlmConfig::default()).unwrap();

        let mut req = request();
        req.provider = "anthropic".to_string();
        assert!(matches!(
            client.complete(req).await,
            Err(AppError::Validation(_))
        ));

        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(ref m) if m.contains("openai")));
    }
}
