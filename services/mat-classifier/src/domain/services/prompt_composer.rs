//! 提示词组装
//!
//! 纯函数，不做任何 IO

use matc_errors::{AppError, AppResult};
use serde::Serialize;

use super::model_client::ChatMessage;
use crate::domain::entities::{MaterialInput, SettingsProfile};
use crate::domain::value_objects::{ClassificationGroups, Specification};

/// 组装主处理请求：system → 示例对 → user
pub fn compose(input: &MaterialInput, settings: &SettingsProfile) -> Vec<ChatMessage> {
    let examples = settings.prompt_examples();

    let mut messages = Vec::with_capacity(2 + examples.len() * 2);
    messages.push(ChatMessage::system(system_prompt(settings)));
    for example in examples {
        messages.push(ChatMessage::user(example.input.clone()));
        messages.push(ChatMessage::assistant(example.output.clone()));
    }
    messages.push(ChatMessage::user(user_prompt(input, &settings.erp_system)));
    messages
}

fn system_prompt(settings: &SettingsProfile) -> String {
    let mut prompt = format!(
        r#"You are an expert Material Master Data specialist for {erp} and other ERP systems.
Your task is to create standardized, ERP-compatible material descriptions and classifications.

Guidelines:
1. Create a short description limited to {short} characters, using abbreviations and uppercase.
2. Create a detailed long description limited to {long} characters.
3. Extract and standardize technical specifications from the provided information.
4. Classify the material into appropriate material groups.
5. Format the output as JSON with the following structure:
{{
  "shortDescription": "SHORT_DESCRIPTION_IN_ERP_FORMAT",
  "longDescription": "DETAILED_DESCRIPTION_WITH_SPECIFICATIONS_AND_STANDARDS",
  "classificationGroups": {{
    "primaryGroup": "PRIMARY_GROUP",
    "secondaryGroup": "SECONDARY_GROUP",
    "tertiaryGroup": "TERTIARY_GROUP"
  }},
  "specifications": [
    {{
      "attribute": "ATTRIBUTE_NAME",
      "value": "VALUE",
      "unit": "UNIT",
      "standard": "APPLICABLE_STANDARD"
    }}
  ]
}}
"#,
        erp = settings.erp_system,
        short = settings.short_desc_limit,
        long = settings.long_desc_limit,
    );

    if let Some(context) = settings
        .additional_context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        prompt.push_str("\nAdditional Context: ");
        prompt.push_str(context);
    }
    prompt
}

fn user_prompt(input: &MaterialInput, erp_system: &str) -> String {
    let fields: [(&str, Option<&str>); 10] = [
        ("Material Name", Some(input.material_name.as_str())),
        ("Material Type", Some(input.material_type.as_str())),
        ("Material ID", input.material_id.as_deref()),
        ("Basic Description", Some(input.basic_description.as_str())),
        ("Technical Specifications", input.technical_specs.as_deref()),
        ("Manufacturer", input.manufacturer.as_deref()),
        ("Model/Part Number", input.model_number.as_deref()),
        ("Primary Group", Some(input.primary_group.as_str())),
        ("Secondary Group", input.secondary_group.as_deref()),
        ("Tertiary Group", input.tertiary_group.as_deref()),
    ];

    let lines: Vec<String> = fields
        .iter()
        .filter_map(|(label, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}: {}", label, v))
        })
        .collect();

    format!(
        "Please process the following material for {}:\n\n{}",
        erp_system,
        lines.join("\n")
    )
}

const ENHANCEMENT_SYSTEM_PROMPT: &str = r#"You are an advanced materials classification expert with deep knowledge of ERP systems,
material science, and machine learning. Your task is to analyze the provided material information and:

1. Suggest alternative classification possibilities with confidence scores and reasoning
2. Identify key attributes that influenced the classification
3. List potentially similar materials in the same category
4. Provide a confidence score for the current classification

Format your output as JSON with the following structure:
{
  "confidence": 0.95,
  "alternativeClassifications": [
    {
      "primaryGroup": "alternative_primary_group",
      "secondaryGroup": "alternative_secondary_group",
      "tertiaryGroup": "alternative_tertiary_group",
      "confidence": 0.85,
      "reasoning": "explanation for why this classification might be appropriate"
    }
  ],
  "keyAttributes": ["attribute1", "attribute2", "attribute3"],
  "similarMaterials": ["similar_material_1", "similar_material_2"]
}
The confidence values use a 0.0 to 1.0 scale."#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhancementSubject<'a> {
    material_name: &'a str,
    material_type: &'a str,
    basic_description: &'a str,
    technical_specs: &'a str,
    manufacturer: &'a str,
    model_number: &'a str,
    current_classification: &'a ClassificationGroups,
    specifications: &'a [Specification],
}

/// 组装增强分析请求
pub fn compose_enhancement(
    input: &MaterialInput,
    classification: &ClassificationGroups,
    specifications: &[Specification],
) -> AppResult<Vec<ChatMessage>> {
    let subject = EnhancementSubject {
        material_name: &input.material_name,
        material_type: &input.material_type,
        basic_description: &input.basic_description,
        technical_specs: input.technical_specs.as_deref().unwrap_or_default(),
        manufacturer: input.manufacturer.as_deref().unwrap_or_default(),
        model_number: input.model_number.as_deref().unwrap_or_default(),
        current_classification: classification,
        specifications,
    };
    let body = serde_json::to_string_pretty(&subject)
        .map_err(|e| AppError::internal(format!("Failed to serialize enhancement subject: {}", e)))?;

    Ok(vec![
        ChatMessage::system(ENHANCEMENT_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Analyze the following material and provide advanced classification insights:\n{}",
            body
        )),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::ChatRole;
    use crate::domain::value_objects::{ExamplePair, LearningMode};

    fn motor() -> MaterialInput {
        MaterialInput {
            material_name: "AC Motor".to_string(),
            material_type: "spare".to_string(),
            basic_description: "3-phase, 15kW, 400V, IP55".to_string(),
            primary_group: "electrical".to_string(),
            manufacturer: Some("ABB".to_string()),
            ..Default::default()
        }
    }

    fn settings_with(mode: LearningMode, n: usize) -> SettingsProfile {
        SettingsProfile {
            learning_mode: mode,
            examples: (1..=n)
                .map(|i| ExamplePair::new(format!("input {}", i), format!("output {}", i)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_none_mode_never_splices_examples() {
        let messages = compose(&motor(), &settings_with(LearningMode::None, 3));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn test_multi_shot_splices_pairs_in_order() {
        let messages = compose(&motor(), &settings_with(LearningMode::MultiShot, 3));
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0].role, ChatRole::System);

        for i in 0..3 {
            let user = &messages[1 + i * 2];
            let assistant = &messages[2 + i * 2];
            assert_eq!(user.role, ChatRole::User);
            assert_eq!(user.content, format!("input {}", i + 1));
            assert_eq!(assistant.role, ChatRole::Assistant);
            assert_eq!(assistant.content, format!("output {}", i + 1));
        }

        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert!(last.content.starts_with("Please process the following material for sap:"));
    }

    #[test]
    fn test_one_shot_splices_every_example() {
        let messages = compose(&motor(), &settings_with(LearningMode::OneShot, 3));
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[1].content, "input 1");
        assert_eq!(messages[2].content, "output 1");
        assert_eq!(messages[5].content, "input 3");
        assert_eq!(messages[6].content, "output 3");
        assert_eq!(messages[7].role, ChatRole::User);
    }

    #[test]
    fn test_one_shot_without_examples() {
        let messages = compose(&motor(), &settings_with(LearningMode::OneShot, 0));
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_system_prompt_embeds_settings() {
        let settings = SettingsProfile {
            erp_system: "oracle".to_string(),
            short_desc_limit: 30,
            long_desc_limit: 500,
            additional_context: Some("Use metric units".to_string()),
            ..Default::default()
        };
        let system = &compose(&motor(), &settings)[0].content;

        assert!(system.contains("specialist for oracle"));
        assert!(system.contains("limited to 30 characters"));
        assert!(system.contains("limited to 500 characters"));
        assert!(system.contains("\"classificationGroups\""));
        assert!(system.ends_with("Additional Context: Use metric units"));
    }

    #[test]
    fn test_system_prompt_without_context() {
        let system = &compose(&motor(), &SettingsProfile::default())[0].content;
        assert!(!system.contains("Additional Context"));
    }

    #[test]
    fn test_user_prompt_lists_non_empty_fields_in_order() {
        let mut input = motor();
        input.tertiary_group = Some("ac_motor".to_string());
        input.model_number = Some("  ".to_string());

        let user = compose(&input, &SettingsProfile::default()).pop().unwrap().content;
        assert_eq!(
            user,
            "Please process the following material for sap:\n\n\
             Material Name: AC Motor\n\
             Material Type: spare\n\
             Basic Description: 3-phase, 15kW, 400V, IP55\n\
             Manufacturer: ABB\n\
             Primary Group: electrical\n\
             Tertiary Group: ac_motor"
        );
    }

    #[test]
    fn test_enhancement_prompt_contains_material_json() {
        let groups = ClassificationGroups {
            primary_group: "electrical".to_string(),
            secondary_group: Some("motor".to_string()),
            tertiary_group: None,
        };
        let messages = compose_enhancement(&motor(), &groups, &[]).unwrap();

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("alternativeClassifications"));
        let user = &messages[1].content;
        assert!(user.starts_with("Analyze the following material"));
        assert!(user.contains("\"materialName\": \"AC Motor\""));
        assert!(user.contains("\"currentClassification\""));
        assert!(user.contains("\"secondaryGroup\": \"motor\""));
    }
}
