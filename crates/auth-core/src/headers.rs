//! 令牌在 HTTP 头中的传递

use http::header::{HeaderMap, HeaderName, HeaderValue};
pub use http::header::AUTHORIZATION;

use crate::TokenError;

/// 响应头：access token
pub const ACCESS_TOKEN_HEADER: &str = "x-jwt-token";
/// 响应头：refresh token
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// 从 `Authorization: Bearer <token>` 中取出令牌，不做校验
pub fn extract_token(headers: &HeaderMap) -> Result<String, TokenError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::MissingToken)?
        .to_str()
        .map_err(|_| TokenError::MissingToken)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.to_string())
        }
        _ => Err(TokenError::MissingToken),
    }
}

/// 写入 `x-jwt-token`
pub fn write_access_header(headers: &mut HeaderMap, token: &str) -> Result<(), TokenError> {
    insert(headers, ACCESS_TOKEN_HEADER, token)
}

pub(crate) fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), TokenError> {
    let value =
        HeaderValue::from_str(value).map_err(|e| TokenError::InvalidHeader(e.to_string()))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
