//! `/health`、`/ready` 与 `/metrics` 端点

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use matc_adapter_postgres::check_connection;
use matc_telemetry::HealthStatus;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::metrics::record_postgres_pool_metrics;

#[derive(Clone)]
struct OpsState {
    pool: PgPool,
    metrics: PrometheusHandle,
}

/// 运维端点路由
pub fn ops_router(pool: PgPool, metrics: PrometheusHandle) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .route("/ready", get(readiness))
        .route("/metrics", get(render_metrics))
        .with_state(OpsState { pool, metrics })
}

/// 存活检查，不访问依赖
async fn liveness() -> impl IntoResponse {
    Json(HealthStatus::new())
}

/// 就绪检查，数据库不可达时返回 503
async fn readiness(State(state): State<OpsState>) -> impl IntoResponse {
    let mut status = HealthStatus::new();
    match check_connection(&state.pool).await {
        Ok(()) => status.add_check("postgres", true, None),
        Err(e) => status.add_check("postgres", false, Some(e.to_string())),
    }

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn render_metrics(State(state): State<OpsState>) -> impl IntoResponse {
    record_postgres_pool_metrics(&state.pool);
    state.metrics.render()
}
