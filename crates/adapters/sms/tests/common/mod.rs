#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use webook_adapter_sms::{SmsError, SmsService};
use webook_common::RequestContext;
use webook_errors::{AppError, AppResult};
use webook_ports::Limiter;

/// 服务商行为
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Ok,
    Fail,
    Cancelled,
}

/// 记录调用次数的假服务商
pub struct FakeSms {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
    sent: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
}

impl FakeSms {
    pub fn new(name: &str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(String, Vec<String>, Vec<String>)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SmsService for FakeSms {
    async fn send(
        &self,
        _ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Ok => {
                self.sent
                    .lock()
                    .push((template_id.to_string(), args.to_vec(), numbers.to_vec()));
                Ok(())
            }
            Behavior::Fail => Err(SmsError::provider(&self.name, "boom")),
            Behavior::Cancelled => Err(SmsError::Cancelled),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 固定返回值的限流器
pub enum FakeLimiter {
    Allow,
    Reject,
    Broken,
}

#[async_trait]
impl Limiter for FakeLimiter {
    async fn limit(&self, _ctx: &RequestContext, _key: &str) -> AppResult<bool> {
        match self {
            FakeLimiter::Allow => Ok(false),
            FakeLimiter::Reject => Ok(true),
            FakeLimiter::Broken => Err(AppError::external_service("limiter down")),
        }
    }
}
