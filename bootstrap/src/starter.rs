//! HTTP 服务启动器
//!
//! 所有服务共用的启动流程

use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, extract::DefaultBodyLimit};
use matc_config::AppConfig;
use matc_errors::AppResult;
use matc_telemetry::init_metrics;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

use crate::cors::build_cors_layer;
use crate::health::ops_router;
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 1. 读取 `.env` 并加载配置
/// 2. 初始化日志与 Prometheus recorder
/// 3. 建立数据库连接池（带重试）
/// 4. 调用 `app_builder` 构建业务路由，合并运维端点并套上公共中间件
/// 5. 监听地址，收到关闭信号后优雅退出
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     matc_bootstrap::run("config", |infra| async move {
///         infra.migrate(&migrations()).await?;
///         Ok(build_router(AppState::new(infra.postgres_pool())))
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(config_dir: &str, app_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = init_metrics()?;
    let infra = Infrastructure::from_config(config.clone(), metrics).await?;
    let ops = ops_router(infra.postgres_pool(), infra.metrics_handle());

    let app = app_builder(infra).await?.merge(ops);
    let app = apply_http_layers(app, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}

/// 公共中间件：请求体上限、CORS、请求追踪
pub fn apply_http_layers(router: Router, config: &AppConfig) -> Router {
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .layer(build_cors_layer(&config.cors, config.is_development()))
        .layer(TraceLayer::new_for_http())
}
