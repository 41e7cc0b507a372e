//! 自定义提取器：请求体与路径参数错误统一返回 400 Problem Details

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use matc_errors::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// 与 `Json<T>` 相同，但拒绝时返回 `AppError::Validation`
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}

/// 解析路径中的整数 ID
pub fn parse_id<T: FromStr>(raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid id '{}': expected an integer", raw)))
}
