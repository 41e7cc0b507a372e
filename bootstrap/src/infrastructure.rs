//! 基础设施资源
//!
//! 由启动器统一创建，交给服务构建路由

use matc_adapter_postgres::{Migration, MigrationManager, PostgresConfig, create_pool};
use matc_common::{RetryConfig, is_retryable_error, with_conditional_retry};
use matc_config::AppConfig;
use matc_errors::{AppError, AppResult};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{error, info};

/// 服务共享的基础设施资源
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    metrics: PrometheusHandle,
}

impl Infrastructure {
    /// 按配置建立数据库连接池，瞬时错误按指数退避重试
    pub async fn from_config(config: AppConfig, metrics: PrometheusHandle) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_conditional_retry(
            &retry_config,
            "PostgreSQL connection",
            || {
                let cfg = pg_config.clone();
                async move { create_pool(&cfg).await }
            },
            |e: &AppError| is_retryable_error(&e.to_string()),
        )
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            config,
            postgres_pool,
            metrics,
        })
    }

    /// 应用迁移，任何迁移失败都会阻止服务启动
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<()> {
        let result = MigrationManager::new(self.postgres_pool.clone())
            .migrate(migrations)
            .await?;

        if let Some(failure) = result.errors.first() {
            error!(
                version = failure.version,
                name = %failure.name,
                error = %failure.error,
                "Migration failed"
            );
            return Err(AppError::database(format!(
                "Migration {} ({}) failed: {}",
                failure.version, failure.name, failure.error
            )));
        }

        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Database migrations up to date"
        );
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn metrics_handle(&self) -> PrometheusHandle {
        self.metrics.clone()
    }
}
