//! HTTP 处理函数

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use matc_errors::{AppError, AppResult};

use super::dto::*;
use super::extract::{ApiJson, parse_id};
use super::multipart::read_batch_upload;
use crate::application::ServiceHandler;
use crate::application::batch::csv_template;
use crate::application::commands::{
    CreateLearningExampleCommand, DeleteLearningExampleCommand, ProcessBatchCommand,
    ProcessMaterialCommand, UpdateMaterialCommand, UpdateSettingsCommand,
};

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ServiceHandler>,
}

impl AppState {
    pub fn new(handler: Arc<ServiceHandler>) -> Self {
        Self { handler }
    }
}

const TEMPLATE_FILENAME: &str = "material_template.csv";

// ========== AI 配置 ==========

pub async fn get_default_settings(State(state): State<AppState>) -> AppResult<Json<AiSettingsDto>> {
    let settings = state.handler.ensure_default_settings().await?;
    Ok(Json(settings.into()))
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AiSettingsDto>> {
    let settings = state.handler.get_settings(parse_id(&id)?).await?;
    Ok(Json(settings.into()))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SettingsOverridesDto>,
) -> AppResult<Json<AiSettingsDto>> {
    let cmd = UpdateSettingsCommand {
        id: parse_id(&id)?,
        overrides: body.try_into()?,
    };
    let settings = state.handler.update_settings(cmd).await?;
    Ok(Json(settings.into()))
}

// ========== 物料处理 ==========

pub async fn process_material(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProcessMaterialRequest>,
) -> AppResult<Json<ProcessedMaterialDto>> {
    let cmd = ProcessMaterialCommand {
        material: body.material.into(),
        overrides: body.settings.try_into()?,
        enable_advanced_ml: body.enable_advanced_ml,
    };
    let processed = state.handler.process_material(cmd).await?;
    Ok(Json(processed.into()))
}

/// 批处理在独立任务中执行，客户端断开不会中断
pub async fn process_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<BatchResponseDto>> {
    let upload = read_batch_upload(multipart).await?;
    let cmd = ProcessBatchCommand {
        csv: upload.csv,
        overrides: upload.settings.try_into()?,
        enable_advanced_ml: upload.enable_advanced_ml,
    };

    let handler = state.handler.clone();
    let outcome = tokio::spawn(async move { handler.process_batch(cmd).await })
        .await
        .map_err(|e| AppError::internal(format!("Batch task failed: {}", e)))??;

    Ok(Json(outcome.into()))
}

pub async fn batch_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILENAME),
            ),
        ],
        csv_template(),
    )
}

// ========== 物料 ==========

pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<MaterialDto>>> {
    let materials = state.handler.list_materials().await?;
    Ok(Json(materials.into_iter().map(Into::into).collect()))
}

pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MaterialDetailDto>> {
    let detail = state.handler.get_material(parse_id(&id)?).await?;
    Ok(Json(detail.into()))
}

pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateMaterialRequest>,
) -> AppResult<Json<MaterialDto>> {
    let cmd = UpdateMaterialCommand {
        id: parse_id(&id)?,
        patch: body.into(),
    };
    let material = state.handler.update_material(cmd).await?;
    Ok(Json(material.into()))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.handler.delete_material(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== 处理历史 ==========

pub async fn list_history(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProcessingHistoryDto>>> {
    let history = state.handler.list_history().await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProcessingHistoryDto>> {
    let history = state.handler.get_history(parse_id(&id)?).await?;
    Ok(Json(history.into()))
}

// ========== 学习样例 ==========

pub async fn list_examples(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LearningExampleDto>>> {
    let examples = state.handler.list_examples().await?;
    Ok(Json(examples.into_iter().map(Into::into).collect()))
}

pub async fn get_example(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LearningExampleDto>> {
    let example = state.handler.get_example(parse_id(&id)?).await?;
    Ok(Json(example.into()))
}

pub async fn create_example(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateLearningExampleRequest>,
) -> AppResult<(StatusCode, Json<LearningExampleDto>)> {
    let cmd = CreateLearningExampleCommand {
        input: body.input,
        output: body.output,
        user_id: None,
    };
    let example = state.handler.create_example(cmd).await?;
    Ok((StatusCode::CREATED, Json(example.into())))
}

pub async fn delete_example(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let cmd = DeleteLearningExampleCommand { id: parse_id(&id)? };
    state.handler.delete_example(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}
