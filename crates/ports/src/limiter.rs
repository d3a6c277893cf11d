//! 限流器 trait 定义

use async_trait::async_trait;
use webook_common::RequestContext;
use webook_errors::AppResult;

/// 限流器
#[async_trait]
pub trait Limiter: Send + Sync {
    /// 消费一次配额，返回 `true` 表示触发限流、本次请求应被拒绝
    async fn limit(&self, ctx: &RequestContext, key: &str) -> AppResult<bool>;
}
