//! JWT Claims

use serde::{Deserialize, Serialize};
use webook_common::{SessionId, UserId};

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Access token claims，绑定签发时的 User-Agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub uid: i64,
    pub ssid: String,
    pub user_agent: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

impl AccessClaims {
    pub fn user_id(&self) -> UserId {
        UserId(self.uid)
    }

    pub fn session_id(&self) -> SessionId {
        SessionId(self.ssid.clone())
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == ACCESS_TOKEN_TYPE
    }
}

/// Refresh token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub uid: i64,
    pub ssid: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

impl RefreshClaims {
    pub fn user_id(&self) -> UserId {
        UserId(self.uid)
    }

    pub fn session_id(&self) -> SessionId {
        SessionId(self.ssid.clone())
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == REFRESH_TOKEN_TYPE
    }
}
