use jsonwebtoken::Algorithm;
use secrecy::Secret;
use std::time::Duration;

use crate::TokenError;

/// 会话令牌配置
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub access_secret: Secret<String>,
    /// 与 access_secret 不同，refresh token 不能当作 access token 使用
    pub refresh_secret: Secret<String>,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// access token 剩余有效期低于该值时续签
    pub rotate_threshold: Duration,
    pub issuer: String,
}

impl SessionConfig {
    pub fn new(access_secret: Secret<String>, refresh_secret: Secret<String>) -> Self {
        Self {
            access_secret,
            refresh_secret,
            algorithm: Algorithm::HS512,
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            rotate_threshold: Duration::from_secs(50),
            issuer: "webook".to_string(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    pub fn with_rotate_threshold(mut self, threshold: Duration) -> Self {
        self.rotate_threshold = threshold;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// 解析签名算法，只接受 HMAC 系列
pub fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(TokenError::UnsupportedAlgorithm(other.to_string())),
    }
}
