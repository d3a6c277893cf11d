//! 带缓存的用户仓储
//!
//! 读：先查缓存，未命中或缓存故障回源数据库，再尽力回填。
//! 读出的资料不带密码哈希，命中与回源结果一致。
//! 写：先删缓存，删除失败则放弃写入；写库后再删一次。

use std::sync::Arc;
use tracing::{debug, warn};
use webook_common::{RequestContext, UserId};

use crate::UserError;
use crate::domain::{NewUser, ProfileUpdate, UserCache, UserDao, UserProfile};

#[derive(Clone)]
pub struct CachedUserRepository {
    dao: Arc<dyn UserDao>,
    cache: Arc<dyn UserCache>,
}

impl CachedUserRepository {
    pub fn new(dao: Arc<dyn UserDao>, cache: Arc<dyn UserCache>) -> Self {
        Self { dao, cache }
    }

    pub async fn find_by_id(&self, ctx: &RequestContext, id: UserId) -> Result<UserProfile, UserError> {
        match self.cache.get(ctx, id).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => debug!(uid = %id, "User cache miss"),
            Err(err) if err.is_interrupted() => return Err(err),
            Err(err) => warn!(uid = %id, error = %err, "User cache read failed, falling back to database"),
        }

        let mut user = self
            .dao
            .find_by_id(ctx, id)
            .await?
            .ok_or(UserError::UserNotFound)?;
        user.password_hash = None;

        match self.cache.set(ctx, &user).await {
            Ok(()) => {}
            Err(err) if err.is_interrupted() => return Err(err),
            Err(err) => warn!(uid = %id, error = %err, "Failed to populate user cache"),
        }
        Ok(user)
    }

    /// 只写数据库，不回填缓存
    pub async fn create(&self, ctx: &RequestContext, user: &NewUser) -> Result<UserId, UserError> {
        self.dao.insert(ctx, user).await
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: &ProfileUpdate,
    ) -> Result<(), UserError> {
        // 旧条目删除成功后才写库
        self.cache.delete(ctx, update.id).await.inspect_err(|err| {
            warn!(uid = %update.id, error = %err, "Failed to invalidate user cache, update aborted");
        })?;

        self.dao.update_selected_fields(ctx, update).await?;

        // 只为收窄并发读回填的窗口
        match self.cache.delete(ctx, update.id).await {
            Ok(()) => {}
            Err(err) if err.is_interrupted() => return Err(err),
            Err(err) => warn!(uid = %update.id, error = %err, "Failed to invalidate user cache after update"),
        }
        Ok(())
    }

    pub async fn find_by_email(&self, ctx: &RequestContext, email: &str) -> Result<UserProfile, UserError> {
        self.dao
            .find_by_email(ctx, email)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn find_by_phone(&self, ctx: &RequestContext, phone: &str) -> Result<UserProfile, UserError> {
        self.dao
            .find_by_phone(ctx, phone)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}
