use thiserror::Error;
use webook_common::Interrupted;
use webook_errors::AppError;

/// 短信发送错误
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Unknown SMS template: {0}")]
    UnknownTemplate(String),

    #[error("SMS template error: {0}")]
    Template(String),

    #[error("SMS sending is rate limited")]
    RateLimited,

    #[error("SMS rate limiter unavailable: {0}")]
    Limiter(String),

    #[error("All {attempts} SMS providers failed")]
    AllProvidersFailed { attempts: usize },

    #[error("SMS sending cancelled")]
    Cancelled,

    #[error("SMS sending deadline exceeded")]
    DeadlineExceeded,
}

impl SmsError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// 调用方取消或超时
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// 限流器返回的错误；取消/超时保持原样
    pub(crate) fn from_limiter(err: AppError) -> Self {
        match err {
            AppError::Cancelled => Self::Cancelled,
            AppError::DeadlineExceeded => Self::DeadlineExceeded,
            other => Self::Limiter(other.to_string()),
        }
    }
}

impl From<Interrupted> for SmsError {
    fn from(err: Interrupted) -> Self {
        match err {
            Interrupted::Cancelled => Self::Cancelled,
            Interrupted::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

impl From<SmsError> for AppError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::RateLimited => AppError::resource_exhausted(err.to_string()),
            SmsError::UnknownTemplate(_) | SmsError::Template(_) => AppError::internal(err.to_string()),
            SmsError::Cancelled => AppError::Cancelled,
            SmsError::DeadlineExceeded => AppError::DeadlineExceeded,
            SmsError::Provider { .. }
            | SmsError::Limiter(_)
            | SmsError::AllProvidersFailed { .. } => AppError::external_service(err.to_string()),
        }
    }
}
