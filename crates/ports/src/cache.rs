//! Cache trait 定义

use async_trait::async_trait;
use std::time::Duration;
use webook_common::RequestContext;
use webook_errors::AppResult;

/// 缓存 trait
///
/// `get` 以 `Ok(None)` 表示键不存在，与后端故障 `Err(_)` 区分开
#[async_trait]
pub trait CachePort: Send + Sync {
    /// 获取缓存值
    async fn get(&self, ctx: &RequestContext, key: &str) -> AppResult<Option<String>>;

    /// 设置缓存值
    async fn set(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> AppResult<()>;

    /// 删除缓存
    async fn delete(&self, ctx: &RequestContext, key: &str) -> AppResult<()>;

    /// 检查是否存在
    async fn exists(&self, ctx: &RequestContext, key: &str) -> AppResult<bool>;
}
