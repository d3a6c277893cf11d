//! 基于缓存的撤销记录存储

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use webook_common::{RequestContext, SessionId};
use webook_errors::AppResult;
use webook_ports::{CachePort, RevocationStore};

/// 撤销记录的缓存键
pub fn revocation_key(session_id: &SessionId) -> String {
    format!("users:ssid:{}", session_id)
}

pub struct CacheRevocationStore {
    cache: Arc<dyn CachePort>,
}

impl CacheRevocationStore {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl RevocationStore for CacheRevocationStore {
    async fn exists(&self, ctx: &RequestContext, session_id: &SessionId) -> AppResult<bool> {
        self.cache.exists(ctx, &revocation_key(session_id)).await
    }

    async fn put(
        &self,
        ctx: &RequestContext,
        session_id: &SessionId,
        ttl: Duration,
    ) -> AppResult<()> {
        self.cache
            .set(ctx, &revocation_key(session_id), "revoked", Some(ttl))
            .await
    }
}
