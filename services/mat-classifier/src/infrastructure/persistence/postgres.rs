//! PostgreSQL repository implementation

use async_trait::async_trait;
use matc_errors::{AppError, AppResult};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::entities::{
    AiSettings, LearningExample, Material, NewLearningExample, NewMaterial, NewProcessingHistory,
    NewProcessingResult, ProcessingHistory, ProcessingResult, SettingsProfile,
};
use crate::domain::repositories::{
    AiSettingsRepository, LearningExampleRepository, MaterialRepository,
    ProcessingHistoryRepository, ProcessingResultRepository,
};
use crate::domain::value_objects::{ExampleId, HistoryId, MaterialId, SettingsId};

use super::converters::{
    ai_settings_from_row, learning_example_from_row, material_from_row,
    processing_history_from_row, processing_result_from_row,
};
use super::rows::{
    AiSettingsRow, LearningExampleRow, MaterialRow, ProcessingHistoryRow, ProcessingResultRow,
};

const MATERIAL_COLUMNS: &str = "id, material_id, material_name, material_type, basic_description, \
     technical_specs, manufacturer, model_number, primary_group, secondary_group, tertiary_group, \
     short_description, long_description, specifications, processed_at, user_id";

const RESULT_COLUMNS: &str = "id, material_id, short_description, long_description, specifications, \
     classification_groups, processed_at";

const HISTORY_COLUMNS: &str =
    "id, batch_id, material_count, successful, failed, processed_at, user_id";

const SETTINGS_COLUMNS: &str = "id, provider, model, temperature, top_p, top_k, erp_system, \
     short_desc_limit, long_desc_limit, learning_mode, additional_context, examples, user_id";

const EXAMPLE_COLUMNS: &str = "id, input, output, user_id";

// ============================================================================
// MaterialRepository 实现
// ============================================================================

pub struct PostgresMaterialRepository {
    pool: PgPool,
}

impl PostgresMaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialRepository for PostgresMaterialRepository {
    async fn create(&self, material: &NewMaterial) -> AppResult<Material> {
        let d = &material.details;
        let sql = format!(
            r#"
            INSERT INTO materials (
                material_id, material_name, material_type, basic_description,
                technical_specs, manufacturer, model_number,
                primary_group, secondary_group, tertiary_group,
                short_description, long_description, specifications, user_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            MATERIAL_COLUMNS
        );

        let row = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(&d.material_id)
            .bind(&d.material_name)
            .bind(&d.material_type)
            .bind(&d.basic_description)
            .bind(&d.technical_specs)
            .bind(&d.manufacturer)
            .bind(&d.model_number)
            .bind(&d.primary_group)
            .bind(&d.secondary_group)
            .bind(&d.tertiary_group)
            .bind(&material.short_description)
            .bind(&material.long_description)
            .bind(Json(&material.specifications))
            .bind(material.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("保存物料失败: {}", e)))?;

        Ok(material_from_row(row))
    }

    async fn find_by_id(&self, id: MaterialId) -> AppResult<Option<Material>> {
        let sql = format!("SELECT {} FROM materials WHERE id = $1", MATERIAL_COLUMNS);

        let row = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询物料失败: {}", e)))?;

        Ok(row.map(material_from_row))
    }

    async fn list(&self) -> AppResult<Vec<Material>> {
        let sql = format!(
            "SELECT {} FROM materials ORDER BY processed_at DESC, id DESC",
            MATERIAL_COLUMNS
        );

        let rows = sqlx::query_as::<_, MaterialRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询物料列表失败: {}", e)))?;

        Ok(rows.into_iter().map(material_from_row).collect())
    }

    async fn update(&self, material: &Material) -> AppResult<Material> {
        let d = &material.details;
        let sql = format!(
            r#"
            UPDATE materials SET
                material_id = $2, material_name = $3, material_type = $4, basic_description = $5,
                technical_specs = $6, manufacturer = $7, model_number = $8,
                primary_group = $9, secondary_group = $10, tertiary_group = $11,
                short_description = $12, long_description = $13, specifications = $14
            WHERE id = $1
            RETURNING {}
            "#,
            MATERIAL_COLUMNS
        );

        let row = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(material.id.0)
            .bind(&d.material_id)
            .bind(&d.material_name)
            .bind(&d.material_type)
            .bind(&d.basic_description)
            .bind(&d.technical_specs)
            .bind(&d.manufacturer)
            .bind(&d.model_number)
            .bind(&d.primary_group)
            .bind(&d.secondary_group)
            .bind(&d.tertiary_group)
            .bind(&material.short_description)
            .bind(&material.long_description)
            .bind(Json(&material.specifications))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("更新物料失败: {}", e)))?;

        row.map(material_from_row)
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", material.id)))
    }

    async fn delete(&self, id: MaterialId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("删除物料失败: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Material {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================================
// ProcessingResultRepository 实现
// ============================================================================

pub struct PostgresProcessingResultRepository {
    pool: PgPool,
}

impl PostgresProcessingResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessingResultRepository for PostgresProcessingResultRepository {
    async fn create(&self, result: &NewProcessingResult) -> AppResult<ProcessingResult> {
        let sql = format!(
            r#"
            INSERT INTO processing_results (
                material_id, short_description, long_description, specifications, classification_groups
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            RESULT_COLUMNS
        );

        let row = sqlx::query_as::<_, ProcessingResultRow>(&sql)
            .bind(result.material_id.0)
            .bind(&result.short_description)
            .bind(&result.long_description)
            .bind(Json(&result.specifications))
            .bind(Json(&result.classification_groups))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("保存处理结果失败: {}", e)))?;

        Ok(processing_result_from_row(row))
    }

    async fn find_by_material_id(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Option<ProcessingResult>> {
        let sql = format!(
            "SELECT {} FROM processing_results WHERE material_id = $1 ORDER BY id LIMIT 1",
            RESULT_COLUMNS
        );

        let row = sqlx::query_as::<_, ProcessingResultRow>(&sql)
            .bind(material_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询处理结果失败: {}", e)))?;

        Ok(row.map(processing_result_from_row))
    }
}

// ============================================================================
// ProcessingHistoryRepository 实现
// ============================================================================

pub struct PostgresProcessingHistoryRepository {
    pool: PgPool,
}

impl PostgresProcessingHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessingHistoryRepository for PostgresProcessingHistoryRepository {
    async fn create(&self, history: &NewProcessingHistory) -> AppResult<ProcessingHistory> {
        let sql = format!(
            r#"
            INSERT INTO processing_history (batch_id, material_count, successful, failed, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            HISTORY_COLUMNS
        );

        let row = sqlx::query_as::<_, ProcessingHistoryRow>(&sql)
            .bind(history.batch_id())
            .bind(history.material_count())
            .bind(history.successful())
            .bind(history.failed())
            .bind(history.user_id())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("保存处理历史失败: {}", e)))?;

        Ok(processing_history_from_row(row))
    }

    async fn find_by_id(&self, id: HistoryId) -> AppResult<Option<ProcessingHistory>> {
        let sql = format!("SELECT {} FROM processing_history WHERE id = $1", HISTORY_COLUMNS);

        let row = sqlx::query_as::<_, ProcessingHistoryRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询处理历史失败: {}", e)))?;

        Ok(row.map(processing_history_from_row))
    }

    async fn list(&self) -> AppResult<Vec<ProcessingHistory>> {
        let sql = format!(
            "SELECT {} FROM processing_history ORDER BY processed_at DESC, id DESC",
            HISTORY_COLUMNS
        );

        let rows = sqlx::query_as::<_, ProcessingHistoryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询处理历史列表失败: {}", e)))?;

        Ok(rows.into_iter().map(processing_history_from_row).collect())
    }
}

// ============================================================================
// AiSettingsRepository 实现
// ============================================================================

pub struct PostgresAiSettingsRepository {
    pool: PgPool,
}

impl PostgresAiSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AiSettingsRepository for PostgresAiSettingsRepository {
    async fn ensure_default(&self, defaults: &SettingsProfile) -> AppResult<AiSettings> {
        sqlx::query(
            r#"
            INSERT INTO ai_settings (
                provider, model, temperature, top_p, top_k, erp_system,
                short_desc_limit, long_desc_limit, learning_mode, additional_context, examples, user_id
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            WHERE NOT EXISTS (SELECT 1 FROM ai_settings)
            "#,
        )
        .bind(&defaults.provider)
        .bind(&defaults.model)
        .bind(&defaults.temperature)
        .bind(&defaults.top_p)
        .bind(&defaults.top_k)
        .bind(&defaults.erp_system)
        .bind(defaults.short_desc_limit)
        .bind(defaults.long_desc_limit)
        .bind(defaults.learning_mode.as_str())
        .bind(&defaults.additional_context)
        .bind(Json(&defaults.examples))
        .bind(defaults.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("创建默认 AI 配置失败: {}", e)))?;

        let sql = format!("SELECT {} FROM ai_settings ORDER BY id ASC LIMIT 1", SETTINGS_COLUMNS);
        let row = sqlx::query_as::<_, AiSettingsRow>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询默认 AI 配置失败: {}", e)))?;

        Ok(ai_settings_from_row(row))
    }

    async fn find_by_id(&self, id: SettingsId) -> AppResult<Option<AiSettings>> {
        let sql = format!("SELECT {} FROM ai_settings WHERE id = $1", SETTINGS_COLUMNS);

        let row = sqlx::query_as::<_, AiSettingsRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询 AI 配置失败: {}", e)))?;

        Ok(row.map(ai_settings_from_row))
    }

    async fn update(&self, settings: &AiSettings) -> AppResult<AiSettings> {
        let p = &settings.profile;
        let sql = format!(
            r#"
            UPDATE ai_settings SET
                provider = $2, model = $3, temperature = $4, top_p = $5, top_k = $6,
                erp_system = $7, short_desc_limit = $8, long_desc_limit = $9,
                learning_mode = $10, additional_context = $11, examples = $12
            WHERE id = $1
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        );

        let row = sqlx::query_as::<_, AiSettingsRow>(&sql)
            .bind(settings.id.0)
            .bind(&p.provider)
            .bind(&p.model)
            .bind(&p.temperature)
            .bind(&p.top_p)
            .bind(&p.top_k)
            .bind(&p.erp_system)
            .bind(p.short_desc_limit)
            .bind(p.long_desc_limit)
            .bind(p.learning_mode.as_str())
            .bind(&p.additional_context)
            .bind(Json(&p.examples))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("更新 AI 配置失败: {}", e)))?;

        row.map(ai_settings_from_row)
            .ok_or_else(|| AppError::not_found(format!("AI settings {} not found", settings.id)))
    }
}

// ============================================================================
// LearningExampleRepository 实现
// ============================================================================

pub struct PostgresLearningExampleRepository {
    pool: PgPool,
}

impl PostgresLearningExampleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearningExampleRepository for PostgresLearningExampleRepository {
    async fn create(&self, example: &NewLearningExample) -> AppResult<LearningExample> {
        let sql = format!(
            "INSERT INTO learning_examples (input, output, user_id) VALUES ($1, $2, $3) RETURNING {}",
            EXAMPLE_COLUMNS
        );

        let row = sqlx::query_as::<_, LearningExampleRow>(&sql)
            .bind(&example.input)
            .bind(&example.output)
            .bind(example.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("保存学习样例失败: {}", e)))?;

        Ok(learning_example_from_row(row))
    }

    async fn find_by_id(&self, id: ExampleId) -> AppResult<Option<LearningExample>> {
        let sql = format!("SELECT {} FROM learning_examples WHERE id = $1", EXAMPLE_COLUMNS);

        let row = sqlx::query_as::<_, LearningExampleRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询学习样例失败: {}", e)))?;

        Ok(row.map(learning_example_from_row))
    }

    async fn list(&self) -> AppResult<Vec<LearningExample>> {
        let sql = format!("SELECT {} FROM learning_examples ORDER BY id", EXAMPLE_COLUMNS);

        let rows = sqlx::query_as::<_, LearningExampleRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询学习样例列表失败: {}", e)))?;

        Ok(rows.into_iter().map(learning_example_from_row).collect())
    }

    async fn delete(&self, id: ExampleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM learning_examples WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("删除学习样例失败: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Learning example {} not found", id)));
        }
        Ok(())
    }
}
