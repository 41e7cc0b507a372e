//! 内嵌 SQL 迁移
//!
//! 每条迁移在独立事务中执行，并记录到 `_migrations` 表；已应用迁移的 SQL 若被修改，校验和不匹配会被报告

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use matc_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{info, warn};

/// 已应用的迁移记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    /// 可包含多条语句
    pub sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = checksum(&sql);
        Self {
            version,
            name: name.into(),
            sql,
            checksum,
        }
    }
}

/// FNV-1a 64 位校验和，跨编译器版本稳定
fn checksum(sql: &str) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = sql
        .trim()
        .bytes()
        .fold(OFFSET, |acc, b| (acc ^ u64::from(b)).wrapping_mul(PRIME));
    format!("{:016x}", hash)
}

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
    table_name: String,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: "_migrations".to_string(),
        }
    }

    /// 创建迁移记录表
    pub async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

        Ok(())
    }

    pub async fn applied_migrations(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {} ORDER BY version ASC",
            self.table_name
        );

        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get migrations: {}", e)))
    }

    /// 在事务中应用单个迁移
    pub async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {} ({}): {}",
                    migration.version, migration.name, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            self.table_name
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = %migration.name,
            "Migration applied"
        );
        Ok(())
    }

    /// 按版本顺序应用所有未执行的迁移，遇到第一个失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;

        let applied: HashMap<i64, MigrationRecord> = self
            .applied_migrations()
            .await?
            .into_iter()
            .map(|record| (record.version, record))
            .collect();

        let mut sorted: Vec<&Migration> = migrations.iter().collect();
        sorted.sort_by_key(|m| m.version);

        let mut result = MigrationResult::default();
        for migration in sorted {
            if let Some(record) = applied.get(&migration.version) {
                if record.checksum != migration.checksum {
                    warn!(
                        version = migration.version,
                        name = %migration.name,
                        "Applied migration has been modified"
                    );
                    result.errors.push(MigrationError {
                        version: migration.version,
                        name: migration.name.clone(),
                        error: "Checksum mismatch - migration has been modified".to_string(),
                    });
                } else {
                    result.skipped.push(migration.version);
                }
                continue;
            }

            if let Err(e) = self.apply(migration).await {
                result.errors.push(MigrationError {
                    version: migration.version,
                    name: migration.name.clone(),
                    error: e.to_string(),
                });
                break;
            }
            result.applied.push(migration.version);
        }

        Ok(result)
    }
}

/// 迁移执行结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
    pub errors: Vec<MigrationError>,
}

impl MigrationResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

#[derive(Debug, Clone)]
pub struct MigrationError {
    pub version: i64,
    pub name: String,
    pub error: String,
}
