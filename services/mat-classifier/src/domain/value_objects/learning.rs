//! 少样本学习相关值对象

use serde::{Deserialize, Serialize};

/// 学习模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "one-shot")]
    OneShot,
    #[serde(rename = "multi-shot")]
    MultiShot,
}

impl LearningMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "one-shot" => Some(Self::OneShot),
            "multi-shot" => Some(Self::MultiShot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneShot => "one-shot",
            Self::MultiShot => "multi-shot",
        }
    }
}

/// 一组输入/期望输出示例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub input: String,
    pub output: String,
}

impl ExamplePair {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}
