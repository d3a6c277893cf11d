use thiserror::Error;
use webook_errors::AppError;

/// 会话令牌错误
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("User-Agent does not match the session")]
    UserAgentMismatch,

    #[error("Session revoked")]
    SessionRevoked,

    #[error("Revocation store unavailable: {0}")]
    RevocationUnavailable(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl TokenError {
    /// 撤销存储返回的错误；取消/超时保持原样，其余一律拒绝请求
    pub(crate) fn from_revocation(err: AppError) -> Self {
        match err {
            AppError::Cancelled => Self::Cancelled,
            AppError::DeadlineExceeded => Self::DeadlineExceeded,
            other => Self::RevocationUnavailable(other.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingToken
            | TokenError::Malformed
            | TokenError::SignatureInvalid
            | TokenError::Expired
            | TokenError::UserAgentMismatch
            | TokenError::SessionRevoked => AppError::unauthenticated(err.to_string()),
            TokenError::RevocationUnavailable(_) => AppError::external_service(err.to_string()),
            TokenError::Signing(_)
            | TokenError::UnsupportedAlgorithm(_)
            | TokenError::InvalidHeader(_) => AppError::internal(err.to_string()),
            TokenError::Cancelled => AppError::Cancelled,
            TokenError::DeadlineExceeded => AppError::DeadlineExceeded,
        }
    }
}
