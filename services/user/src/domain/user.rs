//! 用户资料

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use webook_common::UserId;

/// 用户资料
///
/// 邮箱注册的用户没有手机号，手机号登录创建的用户没有邮箱和密码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// 不写入缓存
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    pub nickname: String,
    pub birthday: Option<NaiveDate>,
    pub about_me: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建用户
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl NewUser {
    pub fn with_email(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            phone: None,
            password_hash: Some(password_hash.into()),
        }
    }

    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            email: None,
            phone: Some(phone.into()),
            password_hash: None,
        }
    }
}

/// 非敏感字段更新，只涉及昵称、生日、简介
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub id: UserId,
    pub nickname: String,
    pub birthday: Option<NaiveDate>,
    pub about_me: String,
}
