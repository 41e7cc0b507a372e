//! 仓储接口

use async_trait::async_trait;
use matc_errors::AppResult;

use crate::domain::entities::{
    AiSettings, LearningExample, Material, NewLearningExample, NewMaterial, NewProcessingHistory,
    NewProcessingResult, ProcessingHistory, ProcessingResult, SettingsProfile,
};
use crate::domain::value_objects::{ExampleId, HistoryId, MaterialId, SettingsId};

/// 物料仓储
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn create(&self, material: &NewMaterial) -> AppResult<Material>;

    async fn find_by_id(&self, id: MaterialId) -> AppResult<Option<Material>>;

    /// 按处理时间倒序
    async fn list(&self) -> AppResult<Vec<Material>>;

    /// 不存在时返回 `NotFound`
    async fn update(&self, material: &Material) -> AppResult<Material>;

    /// 同时删除关联的处理结果；不存在时返回 `NotFound`
    async fn delete(&self, id: MaterialId) -> AppResult<()>;
}

/// 处理结果仓储
#[async_trait]
pub trait ProcessingResultRepository: Send + Sync {
    async fn create(&self, result: &NewProcessingResult) -> AppResult<ProcessingResult>;

    async fn find_by_material_id(&self, material_id: MaterialId)
    -> AppResult<Option<ProcessingResult>>;
}

/// 处理历史仓储（只追加）
#[async_trait]
pub trait ProcessingHistoryRepository: Send + Sync {
    async fn create(&self, history: &NewProcessingHistory) -> AppResult<ProcessingHistory>;

    async fn find_by_id(&self, id: HistoryId) -> AppResult<Option<ProcessingHistory>>;

    /// 按处理时间倒序
    async fn list(&self) -> AppResult<Vec<ProcessingHistory>>;
}

/// AI 配置仓储
#[async_trait]
pub trait AiSettingsRepository: Send + Sync {
    /// 表为空时写入 `defaults`，返回 id 最小的一行；可重复调用
    async fn ensure_default(&self, defaults: &SettingsProfile) -> AppResult<AiSettings>;

    async fn find_by_id(&self, id: SettingsId) -> AppResult<Option<AiSettings>>;

    /// 不存在时返回 `NotFound`
    async fn update(&self, settings: &AiSettings) -> AppResult<AiSettings>;
}

/// 学习样例仓储
#[async_trait]
pub trait LearningExampleRepository: Send + Sync {
    async fn create(&self, example: &NewLearningExample) -> AppResult<LearningExample>;

    async fn find_by_id(&self, id: ExampleId) -> AppResult<Option<LearningExample>>;

    async fn list(&self) -> AppResult<Vec<LearningExample>>;

    /// 不存在时返回 `NotFound`
    async fn delete(&self, id: ExampleId) -> AppResult<()>;
}
