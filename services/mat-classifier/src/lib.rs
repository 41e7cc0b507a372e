//! mat-classifier - 物料主数据分类服务
//!
//! 调用大模型为物料生成标准化描述、分类与规格参数，支持单条与 CSV 批量处理。

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use axum::Router;
use matc_bootstrap::Infrastructure;
use matc_errors::AppResult;
use tracing::info;

use api::{AppState, build_router};
use application::ServiceHandler;
use infrastructure::llm::OpenAiCompatibleClient;
use infrastructure::persistence::{
    PostgresAiSettingsRepository, PostgresLearningExampleRepository, PostgresMaterialRepository,
    PostgresProcessingHistoryRepository, PostgresProcessingResultRepository, migrations,
};

/// 执行迁移、组装依赖并返回业务路由
pub async fn build_app(infra: Infrastructure) -> AppResult<Router> {
    info!("Initializing mat-classifier service...");

    infra.migrate(&migrations()).await?;

    let pool = infra.postgres_pool();
    let material_repo = Arc::new(PostgresMaterialRepository::new(pool.clone()));
    let result_repo = Arc::new(PostgresProcessingResultRepository::new(pool.clone()));
    let history_repo = Arc::new(PostgresProcessingHistoryRepository::new(pool.clone()));
    let settings_repo = Arc::new(PostgresAiSettingsRepository::new(pool.clone()));
    let example_repo = Arc::new(PostgresLearningExampleRepository::new(pool));
    info!("Repositories initialized");

    let model_client = Arc::new(OpenAiCompatibleClient::new(infra.config().llm.clone())?);

    let handler = Arc::new(ServiceHandler::new(
        material_repo,
        result_repo,
        history_repo,
        settings_repo,
        example_repo,
        model_client,
    ));

    let settings = handler.ensure_default_settings().await?;
    info!(settings_id = %settings.id, provider = %settings.profile.provider, "Default AI settings ready");

    Ok(build_router(AppState::new(handler)))
}
