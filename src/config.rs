use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "gradewise.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评分服务地址
    pub gateway_base_url: String,
    /// 本地存储目录（每个键一个 JSON 文件）
    pub data_dir: String,
    /// 未填写学号时发送给评分服务的学生标识
    pub default_student_id: String,
    /// 请求超时（秒），为空表示一直等待
    pub request_timeout_secs: Option<u64>,
    /// 评分进度文案的切换间隔（毫秒）
    pub status_interval_ms: u64,
    /// 保存成功后自动关闭结果视图的延迟（毫秒）
    pub auto_close_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_base_url: "http://127.0.0.1:8000".to_string(),
            data_dir: ".gradewise".to_string(),
            default_student_id: "student-123".to_string(),
            request_timeout_secs: None,
            status_interval_ms: 1800,
            auto_close_delay_ms: 1500,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 加载配置：先读 TOML 配置文件（若存在），再用环境变量覆盖
    ///
    /// 配置文件路径取自 `GRADEWISE_CONFIG`，默认 `gradewise.toml`。
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("GRADEWISE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        let config = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            gateway_base_url: std::env::var("GRADEWISE_API_URL").unwrap_or(self.gateway_base_url),
            data_dir: std::env::var("GRADEWISE_DATA_DIR").unwrap_or(self.data_dir),
            default_student_id: std::env::var("GRADEWISE_STUDENT_ID")
                .unwrap_or(self.default_student_id),
            request_timeout_secs: std::env::var("GRADEWISE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(self.request_timeout_secs),
            status_interval_ms: std::env::var("GRADEWISE_STATUS_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.status_interval_ms),
            auto_close_delay_ms: std::env::var("GRADEWISE_AUTO_CLOSE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.auto_close_delay_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }
}
