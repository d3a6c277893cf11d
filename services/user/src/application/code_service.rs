//! 短信验证码服务

use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use webook_adapter_sms::SmsService;
use webook_common::RequestContext;

use crate::CodeError;
use crate::domain::{CodeConfig, CodeStore};

pub struct CodeService {
    store: Arc<dyn CodeStore>,
    sms: Arc<dyn SmsService>,
    config: CodeConfig,
}

impl CodeService {
    pub fn new(store: Arc<dyn CodeStore>, sms: Arc<dyn SmsService>, config: CodeConfig) -> Self {
        Self { store, sms, config }
    }

    /// 生成并发送验证码
    ///
    /// 短信发送失败时已保存的验证码保留，冷却期内不能重发。
    pub async fn send(&self, ctx: &RequestContext, business: &str, phone: &str) -> Result<(), CodeError> {
        let code = self.generate_code();

        if let Err(err) = self.store.set(ctx, business, phone, &code).await {
            record("send", outcome(&err));
            return Err(err);
        }

        match self
            .sms
            .send(ctx, &self.config.template_id, &[code], &[phone.to_string()])
            .await
        {
            Ok(()) => {
                record("send", "ok");
                info!(business = %business, phone = %phone, "Verification code sent");
                Ok(())
            }
            Err(err) => {
                record("send", "sms_error");
                warn!(business = %business, phone = %phone, error = %err, "Failed to deliver verification code");
                Err(err.into())
            }
        }
    }

    pub async fn verify(
        &self,
        ctx: &RequestContext,
        business: &str,
        phone: &str,
        input: &str,
    ) -> Result<(), CodeError> {
        let result = self.store.verify(ctx, business, phone, input).await;
        match &result {
            Ok(()) => record("verify", "ok"),
            Err(err) => {
                record("verify", outcome(err));
                if matches!(err, CodeError::TooManyVerifies) {
                    warn!(business = %business, phone = %phone, "Verification attempts exhausted");
                }
            }
        }
        result
    }

    fn generate_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.config.length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

fn outcome(err: &CodeError) -> &'static str {
    match err {
        CodeError::TooManySends => "too_many_sends",
        CodeError::TooManyVerifies => "too_many_verifies",
        CodeError::CodeNotFound => "not_found",
        CodeError::CodeMismatch => "mismatch",
        CodeError::Store(_) => "store_error",
        CodeError::Sms(_) => "sms_error",
        CodeError::Cancelled | CodeError::DeadlineExceeded => "interrupted",
    }
}

fn record(op: &'static str, outcome: &'static str) {
    metrics::counter!("verification_code_total", "op" => op, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryCodeStore;
    use webook_adapter_sms::{LocalSmsService, SmsTemplates};
    use webook_common::ManualClock;

    #[test]
    fn test_generated_code_has_configured_length() {
        let config = CodeConfig {
            length: 8,
            ..CodeConfig::default()
        };
        let service = CodeService::new(
            Arc::new(MemoryCodeStore::new(config.clone(), Arc::new(ManualClock::starting_now()))),
            Arc::new(LocalSmsService::new("local", SmsTemplates::default())),
            config,
        );

        for _ in 0..20 {
            let code = service.generate_code();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
