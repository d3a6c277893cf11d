//! 短信验证码

use chrono::{DateTime, Duration, Utc};

/// 验证码配置
#[derive(Debug, Clone)]
pub struct CodeConfig {
    /// 验证码有效期
    pub ttl: Duration,
    /// 两次发送的最小间隔
    pub resend_interval: Duration,
    /// 验证成功后，同一验证码可重复验证的窗口
    pub verify_interval: Duration,
    /// 连续输错达到该次数后拒绝后续验证
    pub max_verify_failures: u32,
    /// 验证码位数
    pub length: usize,
    /// 短信模板 ID
    pub template_id: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(60),
            resend_interval: Duration::seconds(60),
            verify_interval: Duration::seconds(60),
            max_verify_failures: 3,
            length: 6,
            template_id: String::new(),
        }
    }
}

/// 验证码存储键
pub fn code_key(business: &str, phone: &str) -> String {
    format!("phone_code:{}:{}", business, phone)
}

/// 一条已发出的验证码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub business: String,
    pub phone: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub ttl: Duration,
    /// 最近一次验证成功的时间
    pub touched_at: Option<DateTime<Utc>>,
    /// 输错次数
    pub failures: u32,
}

/// 验证结果，供不同存储实现共用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Ok,
    NotFound,
    TooManyVerifies,
    Mismatch,
}

impl VerificationCode {
    pub fn issue(
        business: &str,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            business: business.to_string(),
            phone: phone.to_string(),
            code: code.to_string(),
            issued_at: now,
            ttl,
            touched_at: None,
            failures: 0,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.ttl
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// 是否仍在重发冷却期内
    pub fn blocks_resend(&self, now: DateTime<Utc>, resend_interval: Duration) -> bool {
        self.is_live(now) && now - self.issued_at < resend_interval
    }

    /// 校验候选码并就地更新状态
    ///
    /// 输错只增加失败计数，不改变有效期与最近验证时间。
    pub fn check(&mut self, candidate: &str, now: DateTime<Utc>, config: &CodeConfig) -> VerifyOutcome {
        if !self.is_live(now) {
            return VerifyOutcome::NotFound;
        }
        // 超出重复验证窗口后视为已消费
        if let Some(touched) = self.touched_at {
            if now - touched >= config.verify_interval {
                return VerifyOutcome::NotFound;
            }
        }
        if self.failures >= config.max_verify_failures {
            return VerifyOutcome::TooManyVerifies;
        }
        if self.code != candidate {
            self.failures += 1;
            return VerifyOutcome::Mismatch;
        }
        self.touched_at = Some(now);
        VerifyOutcome::Ok
    }
}
