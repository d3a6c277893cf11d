//! 仓储与存储接口

use async_trait::async_trait;
use webook_common::{RequestContext, UserId};

use crate::domain::{NewUser, ProfileUpdate, UserProfile};
use crate::{CodeError, UserError};

/// 验证码存储
///
/// 同一键上的读取与条件写入必须是一个原子步骤。
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// 保存新验证码，冷却期内返回 `TooManySends`
    async fn set(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        code: &str,
    ) -> Result<(), CodeError>;

    async fn verify(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        candidate: &str,
    ) -> Result<(), CodeError>;
}

/// 关系库用户表
#[async_trait]
pub trait UserDao: Send + Sync {
    async fn insert(&self, ctx: &RequestContext, user: &NewUser) -> Result<UserId, UserError>;

    async fn find_by_id(&self, ctx: &RequestContext, id: UserId)
    -> Result<Option<UserProfile>, UserError>;

    async fn find_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Option<UserProfile>, UserError>;

    async fn find_by_phone(
        &self,
        ctx: &RequestContext,
        phone: &str,
    ) -> Result<Option<UserProfile>, UserError>;

    /// 只更新昵称、生日、简介；用户不存在返回 `UserNotFound`
    async fn update_selected_fields(
        &self,
        ctx: &RequestContext,
        update: &ProfileUpdate,
    ) -> Result<(), UserError>;
}

/// 用户资料缓存，`Ok(None)` 表示未命中
#[async_trait]
pub trait UserCache: Send + Sync {
    async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<Option<UserProfile>, UserError>;

    async fn set(&self, ctx: &RequestContext, user: &UserProfile) -> Result<(), UserError>;

    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), UserError>;
}
