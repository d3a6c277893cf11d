//! webook-auth-core - 认证核心库
//!
//! 会话令牌（access + refresh）的签发、校验、续签与撤销

mod claims;
mod config;
mod error;
mod headers;
mod manager;
mod revocation;

pub use claims::{ACCESS_TOKEN_TYPE, AccessClaims, REFRESH_TOKEN_TYPE, RefreshClaims};
pub use config::{SessionConfig, parse_algorithm};
pub use error::TokenError;
pub use headers::{
    ACCESS_TOKEN_HEADER, AUTHORIZATION, REFRESH_TOKEN_HEADER, extract_token, write_access_header,
};
pub use manager::{SessionTokenManager, SessionTokens};
pub use revocation::{CacheRevocationStore, revocation_key};
