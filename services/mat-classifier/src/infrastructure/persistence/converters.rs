//! 数据库行到领域对象的转换

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::entities::{
    AiSettings, LearningExample, Material, MaterialInput, ProcessingHistory, ProcessingResult,
    SettingsProfile,
};
use crate::domain::value_objects::{
    ClassificationGroups, ExampleId, HistoryId, LearningMode, MaterialId, ProcessingResultId,
    SettingsId,
};

use super::rows::{
    AiSettingsRow, LearningExampleRow, MaterialRow, ProcessingHistoryRow, ProcessingResultRow,
};

/// JSONB 列解析失败时记录告警并回退为默认值
fn json_or_default<T: DeserializeOwned + Default>(value: Option<serde_json::Value>, column: &str) -> T {
    match value {
        None | Some(serde_json::Value::Null) => T::default(),
        Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
            warn!(column, error = %e, "Unreadable JSON column, using default");
            T::default()
        }),
    }
}

pub fn material_from_row(row: MaterialRow) -> Material {
    Material {
        id: MaterialId(row.id),
        details: MaterialInput {
            material_id: row.material_id,
            material_name: row.material_name,
            material_type: row.material_type,
            basic_description: row.basic_description,
            technical_specs: row.technical_specs,
            manufacturer: row.manufacturer,
            model_number: row.model_number,
            primary_group: row.primary_group,
            secondary_group: row.secondary_group,
            tertiary_group: row.tertiary_group,
        },
        short_description: row.short_description,
        long_description: row.long_description,
        specifications: json_or_default(row.specifications, "materials.specifications"),
        processed_at: row.processed_at,
        user_id: row.user_id,
    }
}

pub fn processing_result_from_row(row: ProcessingResultRow) -> ProcessingResult {
    let classification_groups = serde_json::from_value(row.classification_groups)
        .unwrap_or_else(|e| {
            warn!(result_id = row.id, error = %e, "Unreadable classification groups");
            ClassificationGroups {
                primary_group: String::new(),
                secondary_group: None,
                tertiary_group: None,
            }
        });

    ProcessingResult {
        id: ProcessingResultId(row.id),
        material_id: MaterialId(row.material_id),
        short_description: row.short_description,
        long_description: row.long_description,
        specifications: json_or_default(row.specifications, "processing_results.specifications"),
        classification_groups,
        processed_at: row.processed_at,
    }
}

pub fn processing_history_from_row(row: ProcessingHistoryRow) -> ProcessingHistory {
    ProcessingHistory {
        id: HistoryId(row.id),
        batch_id: row.batch_id,
        material_count: row.material_count,
        successful: row.successful,
        failed: row.failed,
        processed_at: row.processed_at,
        user_id: row.user_id,
    }
}

pub fn ai_settings_from_row(row: AiSettingsRow) -> AiSettings {
    let learning_mode = LearningMode::parse(&row.learning_mode).unwrap_or_else(|| {
        warn!(settings_id = row.id, learning_mode = %row.learning_mode, "Unknown learning mode, using none");
        LearningMode::None
    });

    AiSettings {
        id: SettingsId(row.id),
        profile: SettingsProfile {
            provider: row.provider,
            model: row.model,
            temperature: row.temperature,
            top_p: row.top_p,
            top_k: row.top_k,
            erp_system: row.erp_system,
            short_desc_limit: row.short_desc_limit,
            long_desc_limit: row.long_desc_limit,
            learning_mode,
            additional_context: row.additional_context,
            examples: json_or_default(row.examples, "ai_settings.examples"),
            user_id: row.user_id,
        },
    }
}

pub fn learning_example_from_row(row: LearningExampleRow) -> LearningExample {
    LearningExample {
        id: ExampleId(row.id),
        input: row.input,
        output: row.output,
        user_id: row.user_id,
    }
}
