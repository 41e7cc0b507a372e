//! matc-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request data: {} field error(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    /// 外部模型服务调用失败（网络、超时、非 2xx 响应）
    #[error("External service error: {0}")]
    ExternalService(String),

    /// 模型返回内容为空或不符合约定的 JSON 结构
    #[error("Model response error: {0}")]
    ModelResponse(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        Self::InvalidFields(errors)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn model_response(msg: impl Into<String>) -> Self {
        Self::ModelResponse(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::InvalidFields(_) => 400,
            Self::Internal(_) | Self::Database(_) => 500,
            Self::ExternalService(_) | Self::ModelResponse(_) => 502,
        }
    }

    /// 是否为客户端错误
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        let errors = match self {
            Self::InvalidFields(errors) => Some(errors.clone()),
            _ => None,
        };

        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
            errors,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) | Self::InvalidFields(_) => "validation",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
            Self::ExternalService(_) => "external-service",
            Self::ModelResponse(_) => "model-response",
        };
        format!("https://api.matclassifier.dev/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::InvalidFields(_) => "Invalid Request Data",
            Self::Internal(_) => "Internal Server Error",
            Self::Database(_) => "Database Error",
            Self::ExternalService(_) => "External Service Error",
            Self::ModelResponse(_) => "Invalid Model Response",
        }
        .to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let problem = self.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// 字段级错误（仅校验失败时出现）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::invalid_fields(vec![]).status_code(), 400);
        assert_eq!(AppError::database("x").status_code(), 500);
        assert_eq!(AppError::external_service("x").status_code(), 502);
        assert_eq!(AppError::model_response("x").status_code(), 502);
    }

    #[test]
    fn test_problem_details_carries_field_errors() {
        let err = AppError::invalid_fields(vec![FieldError::new("materialName", "required")]);
        let problem = err.to_problem_details();

        assert_eq!(problem.status, 400);
        assert_eq!(problem.title, "Invalid Request Data");
        let errors = problem.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "materialName");
    }

    #[test]
    fn test_problem_details_omits_errors_for_other_variants() {
        let problem = AppError::not_found("Material 7 not found").to_problem_details();
        let json = serde_json::to_value(&problem).unwrap();

        assert!(json.get("errors").is_none());
        assert!(json.get("instance").is_none());
        assert_eq!(json["detail"], "Not found: Material 7 not found");
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = AppError::external_service("timeout").into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let problem: ProblemDetails = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem.status, 502);
        assert_eq!(problem.detail, "External service error: timeout");
    }
}
