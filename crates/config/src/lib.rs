//! matc-config - 配置加载库
//!
//! 加载顺序：`{dir}/default.toml` → `{dir}/{APP_ENV}.toml` → `MATC_` 前缀的环境变量
//! （嵌套字段用 `__` 分隔，例如 `MATC_DATABASE__URL`）

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "MATC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 请求体大小上限（批量上传的 CSV 受此限制）
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit_bytes() -> usize {
    10 * 1024 * 1024
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 强制 JSON 日志；生产环境下总是 JSON
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// 允许的源，支持 `*` 通配符，例如 `https://*.amplifyapp.com`
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// 单个模型供应商配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    pub default_model: String,
}

fn default_openai() -> ProviderConfig {
    ProviderConfig {
        base_url: "https://api.openai.com/v1".to_string(),
        api_key: None,
        default_model: "gpt-4o".to_string(),
    }
}

fn default_deepseek() -> ProviderConfig {
    ProviderConfig {
        base_url: "https://api.deepseek.com/v1".to_string(),
        api_key: None,
        default_model: "deepseek-chat".to_string(),
    }
}

/// 大模型调用配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_openai")]
    pub openai: ProviderConfig,
    #[serde(default = "default_deepseek")]
    pub deepseek: ProviderConfig,
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            openai: default_openai(),
            deepseek: default_deepseek(),
        }
    }
}

impl LlmConfig {
    /// 按名称查找供应商配置
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(&self.openai),
            "deepseek" => Some(&self.deepseek),
            _ => None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    /// 从已组装的 Figment 提取配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
