//! webook-config - 配置加载库

use std::collections::HashMap;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// Redis 配置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Secret<String>,
}

/// JWT 配置
///
/// access/refresh 使用两把独立的密钥，refresh token 无法冒充 access token
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
    /// 剩余有效期低于该值时续签 access token
    #[serde(default = "default_rotate_threshold_secs")]
    pub rotate_threshold_secs: u64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_algorithm() -> String {
    "HS512".to_string()
}

fn default_access_ttl_secs() -> u64 {
    900
}

fn default_refresh_ttl_secs() -> u64 {
    604800
}

fn default_rotate_threshold_secs() -> u64 {
    50
}

fn default_issuer() -> String {
    "webook".to_string()
}

/// 验证码存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStoreKind {
    /// 进程内存储，仅适合单实例部署
    #[default]
    Memory,
    /// Redis 存储，多实例共享
    Redis,
}

/// 验证码配置
#[derive(Debug, Clone, Deserialize)]
pub struct CodeSettings {
    #[serde(default = "default_code_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cooldown_secs")]
    pub resend_interval_secs: u64,
    #[serde(default = "default_cooldown_secs")]
    pub verify_interval_secs: u64,
    #[serde(default = "default_max_verify_failures")]
    pub max_verify_failures: u32,
    #[serde(default = "default_code_length")]
    pub length: usize,
    pub template_id: String,
    #[serde(default)]
    pub store: CodeStoreKind,
}

fn default_code_ttl_secs() -> u64 {
    60
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_max_verify_failures() -> u32 {
    3
}

fn default_code_length() -> usize {
    6
}

/// 短信服务商配置，按列表顺序参与故障转移
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SmsProviderConfig {
    /// 本地开发用，只打日志
    Local {
        #[serde(default = "default_local_name")]
        name: String,
    },
    Twilio {
        #[serde(default = "default_twilio_name")]
        name: String,
        account_sid: String,
        auth_token: Secret<String>,
        from: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_sms_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_local_name() -> String {
    "local".to_string()
}

fn default_twilio_name() -> String {
    "twilio".to_string()
}

fn default_sms_timeout_secs() -> u64 {
    5
}

/// 短信全局限流配置
#[derive(Debug, Clone, Deserialize)]
pub struct SmsRateLimitConfig {
    #[serde(default = "default_rate_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_rate_max_requests")]
    pub max_requests: u64,
}

impl Default for SmsRateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_rate_window_secs(),
            max_requests: default_rate_max_requests(),
        }
    }
}

fn default_rate_window_secs() -> u64 {
    1
}

fn default_rate_max_requests() -> u64 {
    100
}

/// 短信配置
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    pub providers: Vec<SmsProviderConfig>,
    #[serde(default)]
    pub rate_limit: SmsRateLimitConfig,
    /// 模板 ID -> tera 模板正文，参数按位置引用：`{{ args.0 }}`、`{{ args.1 }}`
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

/// 用户缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct UserCacheConfig {
    #[serde(default = "default_user_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for UserCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_user_cache_ttl_secs(),
        }
    }
}

fn default_user_cache_ttl_secs() -> u64 {
    900
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub code: CodeSettings,
    pub sms: SmsConfig,
    #[serde(default)]
    pub user_cache: UserCacheConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 优先级：环境变量 `WEBOOK_*`（层级用 `__` 分隔）> `{env}.toml` > `default.toml`
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("WEBOOK_").split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sms.providers.is_empty() {
            return Err(ConfigError::Invalid(
                "sms.providers must list at least one provider".to_string(),
            ));
        }
        if self.jwt.rotate_threshold_secs >= self.jwt.access_ttl_secs {
            return Err(ConfigError::Invalid(
                "jwt.rotate_threshold_secs must be shorter than jwt.access_ttl_secs".to_string(),
            ));
        }
        if self.code.length == 0 {
            return Err(ConfigError::Invalid("code.length must be positive".to_string()));
        }
        Ok(())
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
