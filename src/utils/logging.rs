//! 日志工具模块
//!
//! 提供日志初始化和输出格式化的辅助函数

use crate::config::Config;
use crate::services::HistoryStats;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时按 `verbose` 选择 debug 或 info。
/// 重复调用不会报错（测试中会多次调用）。
///
/// # 参数
/// - `verbose`: 是否输出详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 GradeWise 启动");
    info!("🌐 评分服务: {}", config.gateway_base_url);
    info!("📁 本地数据目录: {}", config.data_dir);
    match config.request_timeout_secs {
        Some(secs) => info!("⏱️ 请求超时: {} 秒", secs),
        None => info!("⏱️ 请求超时: 不限制"),
    }
    info!("{}", "=".repeat(60));
}

/// 打印历史统计信息
///
/// # 参数
/// - `stats`: 历史汇总
pub fn log_history_stats(stats: &HistoryStats) {
    info!("{}", "─".repeat(60));
    info!("📊 已评分: {} 份", stats.total);
    match stats.average_percent {
        Some(avg) => info!("📈 平均得分率: {:.1}%", avg),
        None => info!("📈 平均得分率: -"),
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("评分标准解析失败", 4), "评分标准...");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
