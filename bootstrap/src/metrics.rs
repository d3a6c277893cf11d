//! Metrics 记录器
//!
//! 短信与验证码计数器（`sms_send_total`、`sms_rate_limited_total`、
//! `verification_code_total`）写入进程级 Prometheus recorder

use metrics_exporter_prometheus::{BuildError, PrometheusHandle};

/// 进程内只能安装一次
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    pub fn install() -> Result<Self, BuildError> {
        let handle = webook_telemetry::init_metrics()?;
        Ok(Self { handle })
    }

    /// Prometheus 文本格式
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn handle(&self) -> PrometheusHandle {
        self.handle.clone()
    }
}
