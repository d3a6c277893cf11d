//! 服务错误定义

use thiserror::Error;
use webook_adapter_sms::SmsError;
use webook_errors::AppError;

/// 验证码错误
#[derive(Debug, Error)]
pub enum CodeError {
    #[error("Verification code sent too frequently")]
    TooManySends,

    #[error("Too many verification attempts")]
    TooManyVerifies,

    #[error("Verification code not found or expired")]
    CodeNotFound,

    #[error("Verification code mismatch")]
    CodeMismatch,

    #[error("Code store unavailable: {0}")]
    Store(String),

    #[error(transparent)]
    Sms(#[from] SmsError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl CodeError {
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Cancelled | Self::DeadlineExceeded => true,
            Self::Sms(err) => err.is_interrupted(),
            _ => false,
        }
    }
}

impl From<webook_common::Interrupted> for CodeError {
    fn from(err: webook_common::Interrupted) -> Self {
        match err {
            webook_common::Interrupted::Cancelled => Self::Cancelled,
            webook_common::Interrupted::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

impl From<CodeError> for AppError {
    fn from(err: CodeError) -> Self {
        match err {
            CodeError::TooManySends | CodeError::TooManyVerifies => {
                AppError::resource_exhausted(err.to_string())
            }
            CodeError::CodeNotFound => AppError::not_found(err.to_string()),
            CodeError::CodeMismatch => AppError::unauthenticated(err.to_string()),
            CodeError::Store(_) => AppError::external_service(err.to_string()),
            CodeError::Sms(sms) => sms.into(),
            CodeError::Cancelled => AppError::Cancelled,
            CodeError::DeadlineExceeded => AppError::DeadlineExceeded,
        }
    }
}

/// 用户错误
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    DuplicateUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("User cache error: {0}")]
    Cache(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl UserError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// 缓存端口返回的错误；取消/超时保持原样
    pub(crate) fn from_cache(err: AppError) -> Self {
        match err {
            AppError::Cancelled => Self::Cancelled,
            AppError::DeadlineExceeded => Self::DeadlineExceeded,
            other => Self::Cache(other.to_string()),
        }
    }
}

impl From<webook_common::Interrupted> for UserError {
    fn from(err: webook_common::Interrupted) -> Self {
        match err {
            webook_common::Interrupted::Cancelled => Self::Cancelled,
            webook_common::Interrupted::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UserNotFound => AppError::not_found(err.to_string()),
            UserError::DuplicateUser => AppError::conflict(err.to_string()),
            UserError::InvalidCredentials => AppError::unauthenticated(err.to_string()),
            UserError::PasswordHash(_) => AppError::internal(err.to_string()),
            UserError::Database(_) => AppError::database(err.to_string()),
            UserError::Cache(_) => AppError::external_service(err.to_string()),
            UserError::Cancelled => AppError::Cancelled,
            UserError::DeadlineExceeded => AppError::DeadlineExceeded,
        }
    }
}
