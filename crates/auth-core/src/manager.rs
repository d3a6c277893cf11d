//! 会话令牌管理

use chrono::Duration as ChronoDuration;
use http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use webook_common::{Clock, RequestContext, SessionId, UserId};
use webook_ports::RevocationStore;

use crate::headers::insert;
use crate::{
    ACCESS_TOKEN_HEADER, ACCESS_TOKEN_TYPE, AccessClaims, REFRESH_TOKEN_HEADER,
    REFRESH_TOKEN_TYPE, RefreshClaims, SessionConfig, TokenError,
};

/// 一次登录签发的令牌对
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub ssid: SessionId,
}

impl SessionTokens {
    /// 写入 `x-jwt-token` 与 `x-refresh-token` 响应头
    pub fn write_headers(&self, headers: &mut HeaderMap) -> Result<(), TokenError> {
        insert(headers, ACCESS_TOKEN_HEADER, &self.access_token)?;
        insert(headers, REFRESH_TOKEN_HEADER, &self.refresh_token)
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// 会话令牌管理器
pub struct SessionTokenManager {
    config: SessionConfig,
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    revocations: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
}

impl SessionTokenManager {
    pub fn new(
        config: SessionConfig,
        revocations: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let access_keys = KeyPair::from_secret(config.access_secret.expose_secret());
        let refresh_keys = KeyPair::from_secret(config.refresh_secret.expose_secret());
        Self {
            config,
            access_keys,
            refresh_keys,
            revocations,
            clock,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// 登录成功后签发新会话
    pub fn issue_session(
        &self,
        uid: UserId,
        user_agent: &str,
    ) -> Result<SessionTokens, TokenError> {
        let ssid = SessionId::generate();
        let access_token = self.sign_access(uid, &ssid, user_agent)?;

        let now = self.clock.now();
        let refresh = RefreshClaims {
            uid: uid.as_i64(),
            ssid: ssid.to_string(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + seconds(self.config.refresh_ttl)).timestamp(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
        };
        let refresh_token = self.sign(&refresh, &self.refresh_keys)?;

        debug!(uid = %uid, ssid = %ssid, "Session issued");
        Ok(SessionTokens {
            access_token,
            refresh_token,
            ssid,
        })
    }

    /// 校验 access token
    ///
    /// 依次检查：格式、签名、过期、User-Agent、撤销。撤销存储不可用时拒绝。
    pub async fn validate_access(
        &self,
        ctx: &RequestContext,
        token: &str,
        user_agent: &str,
    ) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode(token, &self.access_keys)?;
        if !claims.is_access_token() {
            return Err(TokenError::Malformed);
        }
        self.check_expiry(claims.exp)?;
        if claims.user_agent != user_agent {
            warn!(uid = claims.uid, ssid = %claims.ssid, "User-Agent mismatch");
            return Err(TokenError::UserAgentMismatch);
        }
        self.check_revocation(ctx, &claims.session_id()).await?;
        Ok(claims)
    }

    /// 剩余有效期低于阈值时签发新的 access token，会话不变
    ///
    /// 签名失败只记录日志，当前请求照常放行。
    pub fn maybe_rotate(&self, claims: &AccessClaims) -> Option<String> {
        let remaining = claims.exp - self.clock.now().timestamp();
        if remaining >= self.config.rotate_threshold.as_secs() as i64 {
            return None;
        }

        match self.sign_access(claims.user_id(), &claims.session_id(), &claims.user_agent) {
            Ok(token) => {
                debug!(uid = claims.uid, ssid = %claims.ssid, "Access token rotated");
                Some(token)
            }
            Err(err) => {
                warn!(uid = claims.uid, error = %err, "Failed to rotate access token");
                None
            }
        }
    }

    /// 用 refresh token 换取新的 access token
    pub async fn refresh_session(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
        user_agent: &str,
    ) -> Result<String, TokenError> {
        let claims: RefreshClaims = self.decode(refresh_token, &self.refresh_keys)?;
        if !claims.is_refresh_token() {
            return Err(TokenError::Malformed);
        }
        self.check_expiry(claims.exp)?;
        let ssid = claims.session_id();
        self.check_revocation(ctx, &ssid).await?;

        self.sign_access(claims.user_id(), &ssid, user_agent)
    }

    /// 撤销会话，access 与 refresh token 同时失效
    pub async fn revoke(&self, ctx: &RequestContext, ssid: &SessionId) -> Result<(), TokenError> {
        self.revocations
            .put(ctx, ssid, self.config.refresh_ttl)
            .await
            .map_err(TokenError::from_revocation)?;
        debug!(ssid = %ssid, "Session revoked");
        Ok(())
    }

    /// 退出登录
    pub async fn logout(&self, ctx: &RequestContext, claims: &AccessClaims) -> Result<(), TokenError> {
        self.revoke(ctx, &claims.session_id()).await
    }

    fn sign_access(
        &self,
        uid: UserId,
        ssid: &SessionId,
        user_agent: &str,
    ) -> Result<String, TokenError> {
        let now = self.clock.now();
        let claims = AccessClaims {
            uid: uid.as_i64(),
            ssid: ssid.to_string(),
            user_agent: user_agent.to_string(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + seconds(self.config.access_ttl)).timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        self.sign(&claims, &self.access_keys)
    }

    fn sign<T: Serialize>(&self, claims: &T, keys: &KeyPair) -> Result<String, TokenError> {
        encode(&Header::new(self.config.algorithm), claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, token: &str, keys: &KeyPair) -> Result<T, TokenError> {
        // 过期时间按注入的时钟检查
        let mut validation = Validation::new(self.config.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = 0;

        decode::<T>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed,
            })
    }

    fn check_expiry(&self, exp: i64) -> Result<(), TokenError> {
        if exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    async fn check_revocation(
        &self,
        ctx: &RequestContext,
        ssid: &SessionId,
    ) -> Result<(), TokenError> {
        let revoked = self
            .revocations
            .exists(ctx, ssid)
            .await
            .map_err(TokenError::from_revocation)?;
        if revoked {
            return Err(TokenError::SessionRevoked);
        }
        Ok(())
    }
}

fn seconds(d: std::time::Duration) -> ChronoDuration {
    ChronoDuration::seconds(d.as_secs() as i64)
}
