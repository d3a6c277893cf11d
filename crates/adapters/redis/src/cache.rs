//! Redis Cache 实现

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use webook_common::RequestContext;
use webook_errors::AppResult;
use webook_ports::CachePort;

use crate::redis_error;

/// Redis Cache
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// 底层连接，供需要 Lua 脚本的组件复用
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, ctx: &RequestContext, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        ctx.run(conn.get::<_, Option<String>>(key))
            .await?
            .map_err(|e| redis_error("get", e))
    }

    async fn set(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(duration) => {
                // PSETEX 不接受 0
                let millis = (duration.as_millis() as u64).max(1);
                ctx.run(conn.pset_ex::<_, _, ()>(key, value, millis))
                    .await?
                    .map_err(|e| redis_error("set", e))
            }
            None => ctx
                .run(conn.set::<_, _, ()>(key, value))
                .await?
                .map_err(|e| redis_error("set", e)),
        }
    }

    async fn delete(&self, ctx: &RequestContext, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        ctx.run(conn.del::<_, ()>(key))
            .await?
            .map_err(|e| redis_error("delete", e))
    }

    async fn exists(&self, ctx: &RequestContext, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        ctx.run(conn.exists::<_, bool>(key))
            .await?
            .map_err(|e| redis_error("exists", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_connection_manager;

    #[tokio::test]
    #[ignore] // 需要 Redis 实例
    async fn test_set_get_delete_roundtrip() {
        let conn = create_connection_manager("redis://127.0.0.1:6379")
            .await
            .unwrap();
        let cache = RedisCache::new(conn);
        let ctx = RequestContext::background();

        cache
            .set(&ctx, "test:cache:key", "v", Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(
            cache.get(&ctx, "test:cache:key").await.unwrap(),
            Some("v".to_string())
        );
        assert!(cache.exists(&ctx, "test:cache:key").await.unwrap());

        cache.delete(&ctx, "test:cache:key").await.unwrap();
        assert_eq!(cache.get(&ctx, "test:cache:key").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // 需要 Redis 实例
    async fn test_cancelled_context_skips_the_call() {
        let conn = create_connection_manager("redis://127.0.0.1:6379")
            .await
            .unwrap();
        let cache = RedisCache::new(conn);
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = cache.get(&ctx, "test:cache:any").await.unwrap_err();
        assert!(err.is_interrupted());
    }
}
