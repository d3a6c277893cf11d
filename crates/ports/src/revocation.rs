//! 会话撤销记录存储

use async_trait::async_trait;
use std::time::Duration;
use webook_common::{RequestContext, SessionId};
use webook_errors::AppResult;

/// 撤销记录存储：键存在即表示会话已撤销，正常签发时从不写入
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// 会话是否已撤销
    async fn exists(&self, ctx: &RequestContext, session_id: &SessionId) -> AppResult<bool>;

    /// 写入撤销记录，重复写入是幂等的
    async fn put(&self, ctx: &RequestContext, session_id: &SessionId, ttl: Duration)
    -> AppResult<()>;
}
