use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;
use webook_common::RequestContext;
use webook_ports::Limiter;

use crate::{SmsError, SmsService};

/// 全局短信限流键
pub const DEFAULT_LIMITER_KEY: &str = "sms-limiter";

/// 限流装饰器：被限流时不调用下游服务商
pub struct RateLimitSmsService {
    inner: Arc<dyn SmsService>,
    limiter: Arc<dyn Limiter>,
    key: String,
}

impl RateLimitSmsService {
    pub fn new(inner: Arc<dyn SmsService>, limiter: Arc<dyn Limiter>) -> Self {
        Self {
            inner,
            limiter,
            key: DEFAULT_LIMITER_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[async_trait]
impl SmsService for RateLimitSmsService {
    async fn send(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        let limited = self
            .limiter
            .limit(ctx, &self.key)
            .await
            .map_err(SmsError::from_limiter)?;

        if limited {
            warn!(key = %self.key, "SMS rate limit triggered");
            metrics::counter!("sms_rate_limited_total").increment(1);
            return Err(SmsError::RateLimited);
        }

        self.inner.send(ctx, template_id, args, numbers).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
