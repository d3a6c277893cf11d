//! 进程内验证码存储，仅适合单实例部署

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use webook_common::{Clock, RequestContext};

use super::outcome_to_result;
use crate::CodeError;
use crate::domain::{CodeConfig, CodeStore, VerificationCode, code_key};

struct Entries {
    codes: HashMap<String, VerificationCode>,
    next_sweep: DateTime<Utc>,
}

impl Entries {
    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.codes.len();
        self.codes.retain(|_, code| code.is_live(now));
        before - self.codes.len()
    }
}

/// 写入时顺带清理：每个有效期内最多全表扫描一次，
/// 表内只保留最近两个有效期内签发的验证码
pub struct MemoryCodeStore {
    entries: Mutex<Entries>,
    config: CodeConfig,
    clock: Arc<dyn Clock>,
}

impl MemoryCodeStore {
    pub fn new(config: CodeConfig, clock: Arc<dyn Clock>) -> Self {
        let entries = Entries {
            codes: HashMap::new(),
            next_sweep: clock.now(),
        };
        Self {
            entries: Mutex::new(entries),
            config,
            clock,
        }
    }

    /// 清理过期条目，返回清理数量
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.entries.lock().sweep(now)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().codes.is_empty()
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn set(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        code: &str,
    ) -> Result<(), CodeError> {
        ctx.check()?;
        let key = code_key(business, phone);
        let now = self.clock.now();

        let mut entries = self.entries.lock();
        if now >= entries.next_sweep {
            let purged = entries.sweep(now);
            entries.next_sweep = now + self.config.ttl;
            if purged > 0 {
                debug!(purged, "Expired verification codes evicted");
            }
        }
        if let Some(existing) = entries.codes.get(&key) {
            if existing.blocks_resend(now, self.config.resend_interval) {
                return Err(CodeError::TooManySends);
            }
        }
        entries.codes.insert(
            key,
            VerificationCode::issue(business, phone, code, now, self.config.ttl),
        );
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
        ctx.check()?;
        let key = code_key(business, phone);
        let now = self.clock.now();

        let mut entries = self.entries.lock();
        let Some(entry) = entries.codes.get_mut(&key) else {
            return Err(CodeError::CodeNotFound);
        };
        if !entry.is_live(now) {
            entries.codes.remove(&key);
            return Err(CodeError::CodeNotFound);
        }
        outcome_to_result(entry.check(candidate, now, &self.config))
    }
}
