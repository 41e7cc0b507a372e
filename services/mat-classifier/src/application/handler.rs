//! Business logic handler

use std::sync::Arc;

use matc_errors::{AppError, AppResult};
use metrics::counter;
use tracing::{info, warn};

use crate::domain::entities::{
    AiSettings, LearningExample, Material, MaterialInput, NewLearningExample, NewMaterial,
    NewProcessingHistory, NewProcessingResult, ProcessingHistory, ProcessingResult,
    SettingsOverrides, SettingsProfile,
};
use crate::domain::repositories::{
    AiSettingsRepository, LearningExampleRepository, MaterialRepository,
    ProcessingHistoryRepository, ProcessingResultRepository,
};
use crate::domain::services::ModelClient;
use crate::domain::value_objects::{ExampleId, HistoryId, MaterialId, MlClassification, SettingsId};

use super::batch::{BatchOutcome, BatchRowError, decode_csv, new_batch_id};
use super::commands::*;
use super::processor::MaterialProcessor;

/// 处理成功的物料及其结果
#[derive(Debug, Clone)]
pub struct ProcessedMaterial {
    pub material: Material,
    pub result: ProcessingResult,
    pub ml_classification: Option<MlClassification>,
}

/// 物料详情，历史数据可能没有处理结果
#[derive(Debug, Clone)]
pub struct MaterialDetail {
    pub material: Material,
    pub result: Option<ProcessingResult>,
}

pub struct ServiceHandler {
    material_repo: Arc<dyn MaterialRepository>,
    result_repo: Arc<dyn ProcessingResultRepository>,
    history_repo: Arc<dyn ProcessingHistoryRepository>,
    settings_repo: Arc<dyn AiSettingsRepository>,
    example_repo: Arc<dyn LearningExampleRepository>,
    processor: MaterialProcessor,
}

impl ServiceHandler {
    pub fn new(
        material_repo: Arc<dyn MaterialRepository>,
        result_repo: Arc<dyn ProcessingResultRepository>,
        history_repo: Arc<dyn ProcessingHistoryRepository>,
        settings_repo: Arc<dyn AiSettingsRepository>,
        example_repo: Arc<dyn LearningExampleRepository>,
        model_client: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            material_repo,
            result_repo,
            history_repo,
            settings_repo,
            example_repo,
            processor: MaterialProcessor::new(model_client),
        }
    }

    // ========== AI 配置 ==========

    /// 确保存在默认配置并返回
    pub async fn ensure_default_settings(&self) -> AppResult<AiSettings> {
        self.settings_repo
            .ensure_default(&SettingsProfile::default())
            .await
    }

    pub async fn get_settings(&self, id: SettingsId) -> AppResult<AiSettings> {
        self.settings_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("AI settings {} not found", id)))
    }

    pub async fn update_settings(&self, cmd: UpdateSettingsCommand) -> AppResult<AiSettings> {
        let mut settings = self.get_settings(cmd.id).await?;
        settings.apply_overrides(cmd.overrides);
        settings.profile.validate()?;

        let updated = self.settings_repo.update(&settings).await?;
        info!(settings_id = %updated.id, "AI settings updated");
        Ok(updated)
    }

    /// 默认配置叠加请求中的覆盖项
    async fn effective_settings(&self, overrides: SettingsOverrides) -> AppResult<SettingsProfile> {
        let profile = self
            .ensure_default_settings()
            .await?
            .profile
            .with_overrides(overrides);
        profile.validate()?;
        Ok(profile)
    }

    // ========== 物料处理 ==========

    /// 处理单条物料，写入物料、处理结果和一条历史记录
    pub async fn process_material(&self, cmd: ProcessMaterialCommand) -> AppResult<ProcessedMaterial> {
        cmd.validate()?;
        let settings = self.effective_settings(cmd.overrides).await?;
        let input = cmd.material.normalized();

        let processed = match self
            .process_and_store(&input, &settings, cmd.enable_advanced_ml)
            .await
        {
            Ok(processed) => processed,
            Err(e) => {
                counter!("materials_processed_total", "outcome" => "failure").increment(1);
                warn!(material_name = %input.material_name, error = %e, "Material processing failed");
                return Err(e);
            }
        };
        counter!("materials_processed_total", "outcome" => "success").increment(1);

        self.history_repo
            .create(&NewProcessingHistory::single())
            .await?;

        info!(
            material_id = %processed.material.id,
            provider = %settings.provider,
            "Material processed"
        );
        Ok(processed)
    }

    /// 逐行顺序处理 CSV；单行失败不影响其他行，结束时总会写入一条历史记录
    pub async fn process_batch(&self, cmd: ProcessBatchCommand) -> AppResult<BatchOutcome> {
        let settings = self.effective_settings(cmd.overrides).await?;
        let rows = decode_csv(&cmd.csv)?;

        let mut outcome = BatchOutcome::new(new_batch_id());
        info!(
            batch_id = %outcome.batch_id,
            rows = rows.len(),
            provider = %settings.provider,
            "Batch processing started"
        );

        for decoded in rows {
            let row = decoded.row;
            let input = match decoded.material {
                Ok(input) => input,
                Err(error) => {
                    warn!(batch_id = %outcome.batch_id, row, error = %error, "Batch row could not be decoded");
                    counter!("batch_rows_total", "outcome" => "failure").increment(1);
                    outcome.record_failure(BatchRowError {
                        row_number: row,
                        row: decoded.content,
                        error,
                    });
                    continue;
                }
            };

            match self
                .process_and_store(&input, &settings, cmd.enable_advanced_ml)
                .await
            {
                Ok(processed) => {
                    counter!("batch_rows_total", "outcome" => "success").increment(1);
                    counter!("materials_processed_total", "outcome" => "success").increment(1);
                    outcome.record_success(processed);
                }
                Err(e) => {
                    warn!(batch_id = %outcome.batch_id, row, error = %e, "Batch row failed");
                    counter!("batch_rows_total", "outcome" => "failure").increment(1);
                    counter!("materials_processed_total", "outcome" => "failure").increment(1);
                    outcome.record_failure(BatchRowError {
                        row_number: row,
                        row: decoded.content,
                        error: e.to_string(),
                    });
                }
            }
        }

        let history = NewProcessingHistory::batch(
            outcome.batch_id.clone(),
            count(outcome.successful)?,
            count(outcome.failed)?,
        );
        self.history_repo.create(&history).await?;

        info!(
            batch_id = %outcome.batch_id,
            total = outcome.total(),
            successful = outcome.successful,
            failed = outcome.failed,
            "Batch processing finished"
        );
        Ok(outcome)
    }

    async fn process_and_store(
        &self,
        input: &MaterialInput,
        settings: &SettingsProfile,
        enable_advanced_ml: bool,
    ) -> AppResult<ProcessedMaterial> {
        let output = self
            .processor
            .process(input, settings, enable_advanced_ml)
            .await?;

        let material = self
            .material_repo
            .create(&NewMaterial {
                details: input.clone(),
                short_description: output.short_description.clone(),
                long_description: output.long_description.clone(),
                specifications: output.specifications.clone(),
                user_id: None,
            })
            .await?;

        let result = self
            .result_repo
            .create(&NewProcessingResult {
                material_id: material.id,
                short_description: output.short_description,
                long_description: output.long_description,
                specifications: output.specifications,
                classification_groups: output.classification_groups,
            })
            .await?;

        Ok(ProcessedMaterial {
            material,
            result,
            ml_classification: output.ml_classification,
        })
    }

    // ========== 物料 ==========

    pub async fn list_materials(&self) -> AppResult<Vec<Material>> {
        self.material_repo.list().await
    }

    pub async fn get_material(&self, id: MaterialId) -> AppResult<MaterialDetail> {
        let material = self
            .material_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", id)))?;
        let result = self.result_repo.find_by_material_id(id).await?;

        Ok(MaterialDetail { material, result })
    }

    pub async fn update_material(&self, cmd: UpdateMaterialCommand) -> AppResult<Material> {
        cmd.validate()?;

        let mut material = self
            .material_repo
            .find_by_id(cmd.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", cmd.id)))?;
        material.apply_patch(cmd.patch);

        let updated = self.material_repo.update(&material).await?;
        info!(material_id = %updated.id, "Material updated");
        Ok(updated)
    }

    pub async fn delete_material(&self, id: MaterialId) -> AppResult<()> {
        self.material_repo.delete(id).await?;
        info!(material_id = %id, "Material deleted");
        Ok(())
    }

    // ========== 处理历史 ==========

    pub async fn list_history(&self) -> AppResult<Vec<ProcessingHistory>> {
        self.history_repo.list().await
    }

    pub async fn get_history(&self, id: HistoryId) -> AppResult<ProcessingHistory> {
        self.history_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Processing history {} not found", id)))
    }

    // ========== 学习样例 ==========

    pub async fn list_examples(&self) -> AppResult<Vec<LearningExample>> {
        self.example_repo.list().await
    }

    pub async fn get_example(&self, id: ExampleId) -> AppResult<LearningExample> {
        self.example_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Learning example {} not found", id)))
    }

    pub async fn create_example(&self, cmd: CreateLearningExampleCommand) -> AppResult<LearningExample> {
        cmd.validate()?;

        let example = self
            .example_repo
            .create(&NewLearningExample {
                input: cmd.input,
                output: cmd.output,
                user_id: cmd.user_id,
            })
            .await?;
        info!(example_id = %example.id, "Learning example created");
        Ok(example)
    }

    pub async fn delete_example(&self, cmd: DeleteLearningExampleCommand) -> AppResult<()> {
        self.example_repo.delete(cmd.id).await?;
        info!(example_id = %cmd.id, "Learning example deleted");
        Ok(())
    }
}

fn count(n: usize) -> AppResult<i32> {
    i32::try_from(n).map_err(|_| AppError::validation("Batch has too many rows"))
}
