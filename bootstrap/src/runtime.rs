//! 服务运行时

use tracing::{info, warn};
use webook_config::{AppConfig, ConfigError};

use crate::metrics::MetricsRecorder;

/// 加载 `.env`（若存在）后读取配置目录
pub fn load_config(config_dir: &str) -> Result<AppConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "Loaded .env file");
    }
    AppConfig::load(config_dir)
}

/// 初始化日志与 metrics，生产环境或显式配置时输出 JSON
///
/// recorder 已被安装过时返回 `None`，计数器照常写入已有 recorder
pub fn init_runtime(config: &AppConfig) -> Option<MetricsRecorder> {
    let json = config.telemetry.json || config.is_production();
    webook_telemetry::init(&config.telemetry.log_level, json);

    let recorder = match MetricsRecorder::install() {
        Ok(recorder) => Some(recorder),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed");
            None
        }
    };

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        metrics = recorder.is_some(),
        "Runtime initialized"
    );
    recorder
}
