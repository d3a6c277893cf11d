//! Twilio Messages API

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use webook_common::RequestContext;

use crate::{SmsError, SmsService, SmsTemplates};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub name: String,
    pub account_sid: String,
    pub auth_token: Secret<String>,
    /// 发送方号码
    pub from: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Twilio 错误响应体
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TwilioSmsService {
    options: TwilioOptions,
    templates: SmsTemplates,
    client: Client,
}

impl TwilioSmsService {
    pub fn new(options: TwilioOptions, templates: SmsTemplates) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| SmsError::provider(&options.name, format!("Failed to build client: {}", e)))?;

        Ok(Self {
            options,
            templates,
            client,
        })
    }

    fn messages_url(&self) -> String {
        let base = self
            .options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            base, self.options.account_sid
        )
    }

    async fn send_one(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let form = [("To", to), ("From", self.options.from.as_str()), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.options.account_sid,
                Some(self.options.auth_token.expose_secret()),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| SmsError::provider(&self.options.name, format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(provider = %self.options.name, phone = %to, "Twilio accepted message");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<TwilioErrorBody>(&text) {
            Ok(TwilioErrorBody {
                code: Some(code),
                message: Some(message),
            }) => format!("{} ({}): {}", status, code, message),
            _ => format!("{}: {}", status, text),
        };
        warn!(provider = %self.options.name, phone = %to, "Twilio rejected message");
        Err(SmsError::provider(&self.options.name, detail))
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        let body = self.templates.render(template_id, args)?;

        // Twilio 每个号码一次请求，没有批量接口
        for number in numbers {
            ctx.run(self.send_one(number, &body)).await??;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.options.name
    }
}
