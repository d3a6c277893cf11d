//! Redis 验证码存储，多实例共享
//!
//! 读取与条件写入在 Lua 脚本中完成，冷却判断使用注入时钟的时间。

use async_trait::async_trait;
use redis::Script;
use redis::aio::ConnectionManager;
use std::sync::{Arc, LazyLock};
use tracing::debug;
use webook_adapter_redis::redis_error;
use webook_common::{Clock, RequestContext};

use super::outcome_to_result;
use crate::CodeError;
use crate::domain::{CodeConfig, CodeStore, VerifyOutcome, code_key};

const SET_CODE_LUA: &str = r#"
local key = KEYS[1]
local code = ARGV[1]
local now = tonumber(ARGV[2])
local ttl_ms = tonumber(ARGV[3])
local resend_ms = tonumber(ARGV[4])

local state = redis.call('HMGET', key, 'issued_at', 'expires_at')
local issued = tonumber(state[1])
local expires = tonumber(state[2])
if issued and expires and expires > now and now - issued < resend_ms then
    return -1
end

redis.call('DEL', key)
redis.call('HSET', key, 'code', code, 'issued_at', now, 'expires_at', now + ttl_ms, 'failures', 0)
redis.call('PEXPIRE', key, ttl_ms)
return 0
"#;

const VERIFY_CODE_LUA: &str = r#"
local key = KEYS[1]
local candidate = ARGV[1]
local now = tonumber(ARGV[2])
local verify_ms = tonumber(ARGV[3])
local max_failures = tonumber(ARGV[4])

local state = redis.call('HMGET', key, 'code', 'expires_at', 'touched_at', 'failures')
local code = state[1]
local expires = tonumber(state[2])
if not code or not expires or expires <= now then
    return -1
end

local touched = tonumber(state[3])
if touched and now - touched >= verify_ms then
    return -1
end

local failures = tonumber(state[4]) or 0
if failures >= max_failures then
    return -2
end

if code ~= candidate then
    redis.call('HINCRBY', key, 'failures', 1)
    return -3
end

redis.call('HSET', key, 'touched_at', now)
return 0
"#;

static SET_CODE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(SET_CODE_LUA));
static VERIFY_CODE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(VERIFY_CODE_LUA));

#[derive(Clone)]
pub struct RedisCodeStore {
    conn: ConnectionManager,
    config: CodeConfig,
    clock: Arc<dyn Clock>,
}

impl RedisCodeStore {
    pub fn new(conn: ConnectionManager, config: CodeConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            conn,
            config,
            clock,
        }
    }
}

fn verify_outcome(status: i64) -> VerifyOutcome {
    match status {
        0 => VerifyOutcome::Ok,
        -2 => VerifyOutcome::TooManyVerifies,
        -3 => VerifyOutcome::Mismatch,
        _ => VerifyOutcome::NotFound,
    }
}

fn store_error(op: &str, err: redis::RedisError) -> CodeError {
    CodeError::Store(redis_error(op, err).to_string())
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        code: &str,
    ) -> Result<(), CodeError> {
        let key = code_key(business, phone);
        let now = self.clock.now().timestamp_millis();
        let mut conn = self.conn.clone();

        let mut invocation = SET_CODE_SCRIPT.key(&key);
        invocation
            .arg(code)
            .arg(now)
            .arg(self.config.ttl.num_milliseconds().max(1))
            .arg(self.config.resend_interval.num_milliseconds());

        let status: i64 = ctx
            .run(invocation.invoke_async(&mut conn))
            .await?
            .map_err(|e| store_error("set code", e))?;

        if status == -1 {
            return Err(CodeError::TooManySends);
        }
        debug!(business = %business, phone = %phone, "Verification code stored");
        Ok(())
    }

    async fn verify(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        candidate: &str,
    ) -> Result<(), CodeError> {
        let key = code_key(business, phone);
        let now = self.clock.now().timestamp_millis();
        let mut conn = self.conn.clone();

        let mut invocation = VERIFY_CODE_SCRIPT.key(&key);
        invocation
            .arg(candidate)
            .arg(now)
            .arg(self.config.verify_interval.num_milliseconds())
            .arg(self.config.max_verify_failures);

        let status: i64 = ctx
            .run(invocation.invoke_async(&mut conn))
            .await?
            .map_err(|e| store_error("verify code", e))?;

        outcome_to_result(verify_outcome(status))
    }
}
