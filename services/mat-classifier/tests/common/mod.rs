//! 测试公共设施：内存仓储与脚本化模型客户端

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mat_classifier::application::ServiceHandler;
use mat_classifier::application::processor::ENHANCEMENT_TEMPERATURE;
use mat_classifier::domain::entities::*;
use mat_classifier::domain::repositories::*;
use mat_classifier::domain::services::{ChatRole, CompletionRequest, ModelClient};
use mat_classifier::domain::value_objects::*;
use matc_errors::{AppError, AppResult};

// ============ In-memory repositories ============

#[derive(Default)]
pub struct InMemoryMaterials {
    rows: Mutex<Vec<Material>>,
    results: Mutex<Vec<ProcessingResult>>,
}

#[async_trait]
impl MaterialRepository for InMemoryMaterials {
    async fn create(&self, material: &NewMaterial) -> AppResult<Material> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
        let created = Material {
            id: MaterialId(id),
            details: material.details.clone(),
            short_description: Some(material.short_description.clone()),
            long_description: Some(material.long_description.clone()),
            specifications: material.specifications.clone(),
            processed_at: Utc::now(),
            user_id: material.user_id,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: MaterialId) -> AppResult<Option<Material>> {
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Material>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.processed_at.cmp(&a.processed_at).then(b.id.0.cmp(&a.id.0)));
        Ok(rows)
    }

    async fn update(&self, material: &Material) -> AppResult<Material> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|m| m.id == material.id)
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", material.id)))?;
        *slot = material.clone();
        Ok(material.clone())
    }

    async fn delete(&self, id: MaterialId) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        if rows.len() == before {
            return Err(AppError::not_found(format!("Material {} not found", id)));
        }
        // ON DELETE CASCADE
        self.results.lock().unwrap().retain(|r| r.material_id != id);
        Ok(())
    }
}

#[async_trait]
impl ProcessingResultRepository for InMemoryMaterials {
    async fn create(&self, result: &NewProcessingResult) -> AppResult<ProcessingResult> {
        if !self.rows.lock().unwrap().iter().any(|m| m.id == result.material_id) {
            return Err(AppError::database("foreign key violation"));
        }
        let mut results = self.results.lock().unwrap();
        let created = ProcessingResult {
            id: ProcessingResultId(results.len() as i32 + 1),
            material_id: result.material_id,
            short_description: result.short_description.clone(),
            long_description: result.long_description.clone(),
            specifications: result.specifications.clone(),
            classification_groups: result.classification_groups.clone(),
            processed_at: Utc::now(),
        };
        results.push(created.clone());
        Ok(created)
    }

    async fn find_by_material_id(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Option<ProcessingResult>> {
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.material_id == material_id)
            .cloned())
    }
}

impl InMemoryMaterials {
    pub fn material_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn result_count(&self) -> usize {
        self.results.lock().unwrap().len()
    }
}

#[derive(Default)]
pub struct InMemoryHistory {
    rows: Mutex<Vec<ProcessingHistory>>,
}

impl InMemoryHistory {
    pub fn all(&self) -> Vec<ProcessingHistory> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessingHistoryRepository for InMemoryHistory {
    async fn create(&self, history: &NewProcessingHistory) -> AppResult<ProcessingHistory> {
        let mut rows = self.rows.lock().unwrap();
        let created = ProcessingHistory {
            id: HistoryId(rows.len() as i32 + 1),
            batch_id: history.batch_id().map(str::to_string),
            material_count: history.material_count(),
            successful: history.successful(),
            failed: history.failed(),
            processed_at: Utc::now(),
            user_id: history.user_id(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: HistoryId) -> AppResult<Option<ProcessingHistory>> {
        Ok(self.rows.lock().unwrap().iter().find(|h| h.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<ProcessingHistory>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }
}

#[derive(Default)]
pub struct InMemorySettings {
    rows: Mutex<Vec<AiSettings>>,
}

impl InMemorySettings {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AiSettingsRepository for InMemorySettings {
    async fn ensure_default(&self, defaults: &SettingsProfile) -> AppResult<AiSettings> {
        let mut rows = self.rows.lock().unwrap();
        if rows.is_empty() {
            rows.push(AiSettings {
                id: SettingsId(1),
                profile: defaults.clone(),
            });
        }
        Ok(rows[0].clone())
    }

    async fn find_by_id(&self, id: SettingsId) -> AppResult<Option<AiSettings>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, settings: &AiSettings) -> AppResult<AiSettings> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|s| s.id == settings.id)
            .ok_or_else(|| AppError::not_found(format!("AI settings {} not found", settings.id)))?;
        *slot = settings.clone();
        Ok(settings.clone())
    }
}

#[derive(Default)]
pub struct InMemoryExamples {
    rows: Mutex<Vec<LearningExample>>,
}

#[async_trait]
impl LearningExampleRepository for InMemoryExamples {
    async fn create(&self, example: &NewLearningExample) -> AppResult<LearningExample> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
        let created = LearningExample {
            id: ExampleId(id),
            input: example.input.clone(),
            output: example.output.clone(),
            user_id: example.user_id,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: ExampleId) -> AppResult<Option<LearningExample>> {
        Ok(self.rows.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<LearningExample>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn delete(&self, id: ExampleId) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        if rows.len() == before {
            return Err(AppError::not_found(format!("Learning example {} not found", id)));
        }
        Ok(())
    }
}

// ============ Scripted model client ============

type Responder = Box<dyn Fn(&CompletionRequest) -> AppResult<String> + Send + Sync>;

/// 按请求内容返回预设回复，并记录所有请求
pub struct ScriptedModel {
    responder: Responder,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(responder: impl Fn(&CompletionRequest) -> AppResult<String> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 主处理总是返回同一回复；增强分析请求返回错误
    pub fn replying(short_description: &str) -> Self {
        let reply = primary_reply(short_description);
        Self::new(move |req| {
            if is_enhancement(req) {
                Err(AppError::external_service("enhancement unavailable"))
            } else {
                Ok(reply.clone())
            }
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let reply = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        reply
    }
}

pub fn is_enhancement(request: &CompletionRequest) -> bool {
    request.temperature == ENHANCEMENT_TEMPERATURE && request.top_p.is_none()
}

pub fn user_prompt(request: &CompletionRequest) -> &str {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

pub fn primary_reply(short_description: &str) -> String {
    serde_json::json!({
        "shortDescription": short_description,
        "longDescription": "Three-phase AC induction motor, 15 kW, 400 V, IP55",
        "classificationGroups": {
            "primaryGroup": "electrical",
            "secondaryGroup": "motor",
            "tertiaryGroup": "ac_motor"
        },
        "specifications": [
            {"attribute": "Power", "value": "15", "unit": "kW"},
            {"attribute": "Voltage", "value": "400", "unit": "V", "standard": "IEC 60034"}
        ]
    })
    .to_string()
}

// ============ Fixture ============

pub struct Fixture {
    pub handler: Arc<ServiceHandler>,
    pub materials: Arc<InMemoryMaterials>,
    pub history: Arc<InMemoryHistory>,
    pub settings: Arc<InMemorySettings>,
    pub examples: Arc<InMemoryExamples>,
    pub model: Arc<ScriptedModel>,
}

impl Fixture {
    pub fn new(model: ScriptedModel) -> Self {
        let materials = Arc::new(InMemoryMaterials::default());
        let history = Arc::new(InMemoryHistory::default());
        let settings = Arc::new(InMemorySettings::default());
        let examples = Arc::new(InMemoryExamples::default());
        let model = Arc::new(model);

        let handler = Arc::new(ServiceHandler::new(
            materials.clone(),
            materials.clone(),
            history.clone(),
            settings.clone(),
            examples.clone(),
            model.clone(),
        ));

        Self {
            handler,
            materials,
            history,
            settings,
            examples,
            model,
        }
    }
}

pub fn ac_motor() -> MaterialInput {
    MaterialInput {
        material_name: "AC Motor".to_string(),
        material_type: "spare".to_string(),
        basic_description: "3-phase, 15kW, 400V, IP55".to_string(),
        primary_group: "electrical".to_string(),
        ..Default::default()
    }
}
