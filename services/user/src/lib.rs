//! Webook User Service Library
//!
//! 分层：
//! - `domain`: 用户资料、验证码、仓储接口
//! - `application`: 验证码服务、用户服务
//! - `infrastructure`: 验证码存储、Redis 用户缓存、PostgreSQL 用户表、缓存仓储

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{CodeService, UserService};
pub use error::{CodeError, UserError};
