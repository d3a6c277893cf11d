//! webook-bootstrap - 组件装配
//!
//! 从 `AppConfig` 建立连接并组装验证码、用户、会话三类服务

mod components;
mod infrastructure;
mod metrics;
mod retry;
mod runtime;

pub use components::*;
pub use infrastructure::*;
pub use metrics::MetricsRecorder;
pub use retry::{RetryConfig, with_retry};
pub use runtime::*;
