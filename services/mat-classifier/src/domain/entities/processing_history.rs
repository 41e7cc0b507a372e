//! 处理历史

use chrono::{DateTime, Utc};

use crate::domain::value_objects::HistoryId;

/// 一次处理调用（单条或批量）的统计
///
/// 只能通过构造函数创建，保证 `successful + failed == material_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcessingHistory {
    batch_id: Option<String>,
    material_count: i32,
    successful: i32,
    failed: i32,
    user_id: Option<i32>,
}

impl NewProcessingHistory {
    /// 单条物料处理成功
    pub fn single() -> Self {
        Self {
            batch_id: None,
            material_count: 1,
            successful: 1,
            failed: 0,
            user_id: None,
        }
    }

    /// 批量处理汇总
    pub fn batch(batch_id: impl Into<String>, successful: i32, failed: i32) -> Self {
        Self {
            batch_id: Some(batch_id.into()),
            material_count: successful + failed,
            successful,
            failed,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: Option<i32>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn batch_id(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }

    pub fn material_count(&self) -> i32 {
        self.material_count
    }

    pub fn successful(&self) -> i32 {
        self.successful
    }

    pub fn failed(&self) -> i32 {
        self.failed
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingHistory {
    pub id: HistoryId,
    pub batch_id: Option<String>,
    pub material_count: i32,
    pub successful: i32,
    pub failed: i32,
    pub processed_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}
