//! DTO 与领域对象之间的转换

use matc_errors::{AppError, FieldError};

use super::dto::*;
use crate::application::batch::{BatchOutcome, BatchRowError, CsvRow};
use crate::application::{MaterialDetail, ProcessedMaterial};
use crate::domain::entities::{
    AiSettings, LearningExample, Material, MaterialInput, MaterialPatch, ProcessingHistory,
    ProcessingResult, SettingsOverrides,
};
use crate::domain::value_objects::{LearningMode, MlClassification};

// ========== 请求 → 领域 ==========

impl From<MaterialInputDto> for MaterialInput {
    fn from(dto: MaterialInputDto) -> Self {
        Self {
            material_id: dto.material_id,
            material_name: dto.material_name.unwrap_or_default(),
            material_type: dto.material_type.unwrap_or_default(),
            basic_description: dto.basic_description.unwrap_or_default(),
            technical_specs: dto.technical_specs,
            manufacturer: dto.manufacturer,
            model_number: dto.model_number,
            primary_group: dto.primary_group.unwrap_or_default(),
            secondary_group: dto.secondary_group,
            tertiary_group: dto.tertiary_group,
        }
    }
}

impl From<UpdateMaterialRequest> for MaterialPatch {
    fn from(req: UpdateMaterialRequest) -> Self {
        let m = req.material;
        Self {
            material_id: m.material_id,
            material_name: m.material_name,
            material_type: m.material_type,
            basic_description: m.basic_description,
            technical_specs: m.technical_specs,
            manufacturer: m.manufacturer,
            model_number: m.model_number,
            primary_group: m.primary_group,
            secondary_group: m.secondary_group,
            tertiary_group: m.tertiary_group,
            short_description: req.short_description,
            long_description: req.long_description,
            specifications: req.specifications,
        }
    }
}

fn parse_limit(field: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> Option<i32> {
    let raw = value?;
    match raw.trim().parse::<i32>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FieldError::new(field, format!("'{}' is not an integer", raw)));
            None
        }
    }
}

/// 数值范围在合并后由 `SettingsProfile::validate` 校验，这里只处理类型
impl TryFrom<SettingsOverridesDto> for SettingsOverrides {
    type Error = AppError;

    fn try_from(dto: SettingsOverridesDto) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let short_desc_limit = parse_limit("shortDescLimit", dto.short_desc_limit, &mut errors);
        let long_desc_limit = parse_limit("longDescLimit", dto.long_desc_limit, &mut errors);

        let learning_mode = match dto.learning_mode {
            Some(raw) => match LearningMode::parse(&raw) {
                Some(mode) => Some(mode),
                None => {
                    errors.push(FieldError::new(
                        "learningMode",
                        format!("'{}' is not one of none, one-shot, multi-shot", raw),
                    ));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        Ok(Self {
            provider: dto.provider,
            model: dto.model,
            temperature: dto.temperature,
            top_p: dto.top_p,
            top_k: dto.top_k,
            erp_system: dto.erp_system,
            short_desc_limit,
            long_desc_limit,
            learning_mode,
            additional_context: dto.additional_context,
            examples: dto.examples,
        })
    }
}

// ========== 领域 → 响应 ==========

impl From<Material> for MaterialDto {
    fn from(m: Material) -> Self {
        let d = m.details;
        Self {
            id: m.id.0,
            material_id: d.material_id,
            material_name: d.material_name,
            material_type: d.material_type,
            basic_description: d.basic_description,
            technical_specs: d.technical_specs,
            manufacturer: d.manufacturer,
            model_number: d.model_number,
            primary_group: d.primary_group,
            secondary_group: d.secondary_group,
            tertiary_group: d.tertiary_group,
            short_description: m.short_description,
            long_description: m.long_description,
            specifications: m.specifications,
            processed_at: m.processed_at,
            user_id: m.user_id,
        }
    }
}

fn result_dto(r: ProcessingResult, ml: Option<MlClassification>) -> ProcessingResultDto {
    ProcessingResultDto {
        id: r.id.0,
        material_id: r.material_id.0,
        short_description: r.short_description,
        long_description: r.long_description,
        specifications: r.specifications,
        classification_groups: r.classification_groups,
        processed_at: r.processed_at,
        ml_classification: ml,
    }
}

impl From<ProcessedMaterial> for ProcessedMaterialDto {
    fn from(p: ProcessedMaterial) -> Self {
        Self {
            material: p.material.into(),
            processing_result: result_dto(p.result, p.ml_classification),
        }
    }
}

impl From<MaterialDetail> for MaterialDetailDto {
    fn from(d: MaterialDetail) -> Self {
        Self {
            material: d.material.into(),
            processing_result: d.result.map(|r| result_dto(r, None)),
        }
    }
}

impl From<ProcessingHistory> for ProcessingHistoryDto {
    fn from(h: ProcessingHistory) -> Self {
        Self {
            id: h.id.0,
            batch_id: h.batch_id,
            material_count: h.material_count,
            successful: h.successful,
            failed: h.failed,
            processed_at: h.processed_at,
            user_id: h.user_id,
        }
    }
}

impl From<AiSettings> for AiSettingsDto {
    fn from(s: AiSettings) -> Self {
        let p = s.profile;
        Self {
            id: s.id.0,
            provider: p.provider,
            model: p.model,
            temperature: p.temperature,
            top_p: p.top_p,
            top_k: p.top_k,
            erp_system: p.erp_system,
            short_desc_limit: p.short_desc_limit,
            long_desc_limit: p.long_desc_limit,
            learning_mode: p.learning_mode.as_str().to_string(),
            additional_context: p.additional_context,
            examples: p.examples,
            user_id: p.user_id,
        }
    }
}

impl From<LearningExample> for LearningExampleDto {
    fn from(e: LearningExample) -> Self {
        Self {
            id: e.id.0,
            input: e.input,
            output: e.output,
            user_id: e.user_id,
        }
    }
}

impl From<BatchRowError> for BatchRowErrorDto {
    fn from(e: BatchRowError) -> Self {
        Self {
            row_number: e.row_number,
            row: e.row.into(),
            error: e.error,
        }
    }
}

impl From<CsvRow> for CsvRowDto {
    fn from(r: CsvRow) -> Self {
        Self {
            material_name: r.material_name,
            material_type: r.material_type,
            material_id: r.material_id,
            basic_description: r.basic_description,
            technical_specs: r.technical_specs,
            manufacturer: r.manufacturer,
            model_number: r.model_number,
            primary_group: r.primary_group,
            secondary_group: r.secondary_group,
            tertiary_group: r.tertiary_group,
        }
    }
}

impl From<BatchOutcome> for BatchResponseDto {
    fn from(o: BatchOutcome) -> Self {
        Self {
            total: o.total(),
            batch_id: o.batch_id,
            successful: o.successful,
            failed: o.failed,
            results: o.results.into_iter().map(Into::into).collect(),
            errors: o.errors.into_iter().map(Into::into).collect(),
        }
    }
}
