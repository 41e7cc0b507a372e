//! 连接池指标

use metrics::gauge;
use sqlx::PgPool;

/// 在渲染 `/metrics` 前刷新连接池快照
pub fn record_postgres_pool_metrics(pool: &PgPool) {
    let size = pool.size() as f64;
    let idle = pool.num_idle() as f64;
    let active = (size - idle).max(0.0);

    gauge!("postgres_pool_size").set(size);
    gauge!("postgres_pool_idle").set(idle);
    gauge!("postgres_pool_active").set(active);

    let utilization = if size > 0.0 {
        active / size * 100.0
    } else {
        0.0
    };
    gauge!("postgres_pool_utilization").set(utilization);
}
