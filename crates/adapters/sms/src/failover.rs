use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};
use webook_common::RequestContext;

use crate::{SmsError, SmsService};

/// 故障转移：每次调用从轮转位置开始，依次尝试每个服务商一次
pub struct FailoverSmsService {
    providers: Vec<Arc<dyn SmsService>>,
    idx: AtomicU64,
}

impl FailoverSmsService {
    pub fn new(providers: Vec<Arc<dyn SmsService>>) -> Self {
        Self {
            providers,
            idx: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl SmsService for FailoverSmsService {
    async fn send(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        let len = self.providers.len();
        if len == 0 {
            return Err(SmsError::AllProvidersFailed { attempts: 0 });
        }

        let start = (self.idx.fetch_add(1, Ordering::Relaxed) % len as u64) as usize;
        for offset in 0..len {
            let provider = &self.providers[(start + offset) % len];
            match provider.send(ctx, template_id, args, numbers).await {
                Ok(()) => {
                    metrics::counter!(
                        "sms_send_total",
                        "provider" => provider.name().to_string(),
                        "outcome" => "ok"
                    )
                    .increment(1);
                    info!(provider = %provider.name(), "SMS sent");
                    return Ok(());
                }
                Err(err) if err.is_interrupted() => return Err(err),
                Err(err) => {
                    metrics::counter!(
                        "sms_send_total",
                        "provider" => provider.name().to_string(),
                        "outcome" => "error"
                    )
                    .increment(1);
                    warn!(provider = %provider.name(), error = %err, "SMS provider failed, trying next");
                }
            }
        }

        Err(SmsError::AllProvidersFailed { attempts: len })
    }

    fn name(&self) -> &str {
        "failover"
    }
}
