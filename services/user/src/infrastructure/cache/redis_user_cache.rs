//! 用户资料缓存实现

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use webook_common::{RequestContext, UserId};
use webook_ports::CachePort;

use crate::UserError;
use crate::domain::{UserCache, UserProfile};

/// 用户资料缓存键
pub fn user_key(id: UserId) -> String {
    format!("user:info:{}", id)
}

/// 基于 `CachePort` 的用户缓存，JSON 存储
pub struct RedisUserCache {
    cache: Arc<dyn CachePort>,
    ttl: Duration,
}

impl RedisUserCache {
    pub fn new(cache: Arc<dyn CachePort>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<Option<UserProfile>, UserError> {
        let Some(raw) = self
            .cache
            .get(ctx, &user_key(id))
            .await
            .map_err(UserError::from_cache)?
        else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| UserError::Cache(format!("Failed to decode cached user: {}", e)))
    }

    async fn set(&self, ctx: &RequestContext, user: &UserProfile) -> Result<(), UserError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| UserError::Cache(format!("Failed to encode user: {}", e)))?;
        self.cache
            .set(ctx, &user_key(user.id), &raw, Some(self.ttl))
            .await
            .map_err(UserError::from_cache)
    }

    async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<(), UserError> {
        self.cache
            .delete(ctx, &user_key(id))
            .await
            .map_err(UserError::from_cache)
    }
}
