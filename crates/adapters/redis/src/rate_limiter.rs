//! 限流器模块
//!
//! 基于 Redis 有序集合的滑动窗口限流

use async_trait::async_trait;
use redis::Script;
use redis::aio::ConnectionManager;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use webook_common::RequestContext;
use webook_errors::AppResult;
use webook_ports::Limiter;

use crate::redis_error;

static SLIDING_WINDOW_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(SLIDING_WINDOW_LUA));

const SLIDING_WINDOW_LUA: &str = r#"
local key = KEYS[1]
local limit = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local now = tonumber(ARGV[3])
local member = ARGV[4]
local window_start = now - window_ms

-- 移除窗口外的请求
redis.call('ZREMRANGEBYSCORE', key, '-inf', window_start)

local current = redis.call('ZCARD', key)
local allowed = current < limit

if allowed then
    redis.call('ZADD', key, now, member)
    current = current + 1
end

redis.call('PEXPIRE', key, window_ms)

local remaining = limit - current
if remaining < 0 then
    remaining = 0
end

local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
local reset_after = window_ms
if #oldest >= 2 then
    reset_after = tonumber(oldest[2]) + window_ms - now
    if reset_after < 0 then
        reset_after = 0
    end
end

return {allowed and 1 or 0, remaining, reset_after, limit}
"#;

/// 限流结果
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// 是否允许
    pub allowed: bool,
    /// 剩余配额
    pub remaining: i64,
    /// 窗口内最早一次请求滑出所需毫秒数
    pub reset_after_ms: i64,
    /// 总配额
    pub limit: i64,
}

impl RateLimitResult {
    /// 是否被限流
    pub fn is_limited(&self) -> bool {
        !self.allowed
    }
}

/// Redis 滑动窗口限流器
#[derive(Clone)]
pub struct RedisSlidingWindowLimiter {
    conn: ConnectionManager,
    key_prefix: String,
    window: Duration,
    limit: i64,
}

impl RedisSlidingWindowLimiter {
    pub fn new(conn: ConnectionManager, window: Duration, limit: i64) -> Self {
        Self {
            conn,
            key_prefix: "ratelimit".to_string(),
            window,
            limit,
        }
    }

    /// 设置键前缀
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn rate_limit_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    /// 检查并消费配额
    pub async fn check(&self, ctx: &RequestContext, key: &str) -> AppResult<RateLimitResult> {
        let rate_key = self.rate_limit_key(key);
        let now = chrono::Utc::now().timestamp_millis();
        let window_ms = (self.window.as_millis() as i64).max(1);
        // 同一毫秒内的请求也要各占一个成员
        let member = format!("{}-{}", now, uuid::Uuid::new_v4());

        let mut conn = self.conn.clone();
        let mut invocation = SLIDING_WINDOW_SCRIPT.key(&rate_key);
        invocation
            .arg(self.limit)
            .arg(window_ms)
            .arg(now)
            .arg(member);

        let result: Vec<i64> = ctx
            .run(invocation.invoke_async(&mut conn))
            .await?
            .map_err(|e| redis_error("rate limit", e))?;

        let rate_result = RateLimitResult {
            allowed: result.first().copied() == Some(1),
            remaining: result.get(1).copied().unwrap_or(0),
            reset_after_ms: result.get(2).copied().unwrap_or(window_ms),
            limit: result.get(3).copied().unwrap_or(self.limit),
        };

        debug!(
            key = %key,
            allowed = rate_result.allowed,
            remaining = rate_result.remaining,
            "Sliding window rate limit check"
        );

        Ok(rate_result)
    }
}

#[async_trait]
impl Limiter for RedisSlidingWindowLimiter {
    async fn limit(&self, ctx: &RequestContext, key: &str) -> AppResult<bool> {
        Ok(self.check(ctx, key).await?.is_limited())
    }
}
