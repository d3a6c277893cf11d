//! SMS 适配器
//!
//! 提供短信发送功能，支持：
//! - 多服务商（本地开发、Twilio）
//! - 全局限流装饰器
//! - 按轮转顺序的故障转移

mod error;
mod failover;
mod local;
mod ratelimit;
mod template;
mod twilio;

pub use error::SmsError;
pub use failover::FailoverSmsService;
pub use local::LocalSmsService;
pub use ratelimit::{DEFAULT_LIMITER_KEY, RateLimitSmsService};
pub use template::SmsTemplates;
pub use twilio::{TwilioOptions, TwilioSmsService};

use webook_common::RequestContext;

/// 短信发送接口
///
/// `template_id` 与 `args` 的解释由具体服务商决定。
#[async_trait::async_trait]
pub trait SmsService: Send + Sync {
    /// 多个号码按顺序逐个发送，遇到第一个失败即返回错误。
    ///
    /// 失败前已送达的号码不会回报，`FailoverSmsService` 换下一家时会
    /// 向全部号码重发，这些号码可能收到两条短信。验证码每次只发一个号码。
    async fn send(
        &self,
        ctx: &RequestContext,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError>;

    /// 服务商名称，用于日志和指标
    fn name(&self) -> &str;
}
