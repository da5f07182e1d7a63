// ==========================================
// 车队班次仿真 - 日志初始化
// ==========================================
// 输出: tracing-subscriber (文本 / JSON 行)
// 配置来源: LogSettings 显式传入, 或环境变量
// 说明: 重复初始化静默忽略 (嵌入方可能已安装 subscriber)
// ==========================================

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量 (text / json)
pub const LOG_FORMAT_ENV: &str = "HAUL_FLEET_SIM_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// ==========================================
// LogSettings - 日志参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// EnvFilter 指令, 例如 `info` 或 `haul_fleet_sim=debug,perf=info`
    pub directives: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            directives: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LogSettings {
    /// 从 RUST_LOG 与 HAUL_FLEET_SIM_LOG_FORMAT 读取, 缺失时取默认
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            directives: std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.directives),
            format: std::env::var(LOG_FORMAT_ENV)
                .ok()
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
        }
    }
}

/// 按环境变量初始化日志
///
/// ```no_run
/// haul_fleet_sim::logging::init();
/// ```
pub fn init() {
    init_with(&LogSettings::from_env());
}

/// 按显式参数初始化日志, 非法过滤指令回退到 info
pub fn init_with(settings: &LogSettings) {
    let filter = EnvFilter::try_new(&settings.directives).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match settings.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_line_number(true)
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("全局 subscriber 已存在,跳过日志初始化");
    }
}

/// 测试用日志: 本 crate 与 perf 目标 debug 级, 输出走测试捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("haul_fleet_sim=debug,perf=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" plain "), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: LogSettings = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.directives, "info");
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test();
        init_with(&LogSettings::default());
    }
}
