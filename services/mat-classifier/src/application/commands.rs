//! Command definitions

use matc_errors::{AppError, AppResult, FieldError};

use crate::domain::entities::{MaterialInput, MaterialPatch, SettingsOverrides};
use crate::domain::value_objects::{ExampleId, MaterialId, SettingsId};

/// 处理单条物料
#[derive(Debug, Clone)]
pub struct ProcessMaterialCommand {
    pub material: MaterialInput,
    /// 叠加在默认配置之上
    pub overrides: SettingsOverrides,
    pub enable_advanced_ml: bool,
}

impl ProcessMaterialCommand {
    pub fn validate(&self) -> AppResult<()> {
        let m = &self.material;
        let required = [
            ("materialName", &m.material_name),
            ("materialType", &m.material_type),
            ("basicDescription", &m.basic_description),
            ("primaryGroup", &m.primary_group),
        ];

        let errors: Vec<FieldError> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError::new(*field, "is required"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(errors))
        }
    }
}

/// 批量处理上传的 CSV
#[derive(Debug, Clone)]
pub struct ProcessBatchCommand {
    pub csv: Vec<u8>,
    pub overrides: SettingsOverrides,
    pub enable_advanced_ml: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub id: SettingsId,
    pub overrides: SettingsOverrides,
}

#[derive(Debug, Clone)]
pub struct UpdateMaterialCommand {
    pub id: MaterialId,
    pub patch: MaterialPatch,
}

impl UpdateMaterialCommand {
    /// 必填字段不能被改为空
    pub fn validate(&self) -> AppResult<()> {
        let p = &self.patch;
        let required = [
            ("materialName", &p.material_name),
            ("materialType", &p.material_type),
            ("basicDescription", &p.basic_description),
            ("primaryGroup", &p.primary_group),
        ];

        let errors: Vec<FieldError> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
            .map(|(field, _)| FieldError::new(*field, "must not be empty"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(errors))
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateLearningExampleCommand {
    pub input: String,
    pub output: String,
    pub user_id: Option<i32>,
}

impl CreateLearningExampleCommand {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.input.trim().is_empty() {
            errors.push(FieldError::new("input", "is required"));
        }
        if self.output.trim().is_empty() {
            errors.push(FieldError::new("output", "is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(errors))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteLearningExampleCommand {
    pub id: ExampleId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_command_requires_core_fields() {
        let cmd = ProcessMaterialCommand {
            material: MaterialInput {
                material_name: "Bearing".to_string(),
                basic_description: "  ".to_string(),
                ..Default::default()
            },
            overrides: SettingsOverrides::default(),
            enable_advanced_ml: false,
        };

        match cmd.validate() {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["materialType", "basicDescription", "primaryGroup"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_update_command_rejects_blanking_required_field() {
        let cmd = UpdateMaterialCommand {
            id: MaterialId(1),
            patch: MaterialPatch {
                material_name: Some(" ".to_string()),
                manufacturer: Some(String::new()),
                ..Default::default()
            },
        };
        assert!(matches!(cmd.validate(), Err(AppError::InvalidFields(e)) if e.len() == 1));
    }

    #[test]
    fn test_learning_example_command() {
        let ok = CreateLearningExampleCommand {
            input: "Ball bearing 6204".to_string(),
            output: "BRG,BALL,6204".to_string(),
            user_id: None,
        };
        assert!(ok.validate().is_ok());

        let bad = CreateLearningExampleCommand {
            input: String::new(),
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
