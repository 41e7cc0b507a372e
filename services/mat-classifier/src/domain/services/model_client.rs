//! 大模型调用接口

use async_trait::async_trait;
use matc_errors::AppResult;
use serde::{Deserialize, Serialize};

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 单次对话补全请求，总是要求 JSON 对象回复
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub provider: String,
    /// 为空时由客户端使用供应商默认模型
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: Option<f32>,
}

/// 模型客户端
///
/// 网络错误、超时、非 2xx 返回 `ExternalService`；未知供应商返回 `Validation`
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// 返回回复内容原文
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}
