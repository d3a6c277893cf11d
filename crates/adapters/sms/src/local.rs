use async_trait::async_trait;
use tracing::info;
use webook_common::RequestContext;

use crate::{SmsError, SmsService, SmsTemplates};

/// 本地开发用服务商，只把短信内容写进日志
#[derive(Debug, Clone)]
pub struct LocalSmsService {
    name: String,
    templates: SmsTemplates,
}

impl LocalSmsService {
    pub fn new(name: impl Into<String>, templates: SmsTemplates) -> Self {
        Self {
            name: name.into(),
            templates,
        }
    }
}

#[async_trait]
impl SmsService for LocalSmsService {
    async fn send(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        ctx.check()?;

        let body = if self.templates.contains(template_id) {
            self.templates.render(template_id, args)?
        } else {
            format!("[{}] {}", template_id, args.join(", "))
        };

        for number in numbers {
            info!(provider = %self.name, phone = %number, body = %body, "Local SMS sent");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
