// ============================================================================
// CapsFix - 日志工具
// ============================================================================
//
// 文件: src/utils/logger.rs
// 职责: 控制台日志输出与 tracing 初始化
// 边界:
//   - ✅ 带前缀的控制台输出
//   - ✅ tracing 订阅器初始化 (CAPSFIX_LOG)
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含文件日志写入
//
// ============================================================================

use tracing_subscriber::EnvFilter;

use super::colors::Colors;
use super::constants::{APP_NAME, LOG_ENV};

/// 简单的日志工具
pub struct Logger;

impl Logger {
    pub fn info<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::info(&format!("[{}]", APP_NAME)), msg.as_ref());
    }

    pub fn warn<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::warn("[WARN]"), msg.as_ref());
    }

    pub fn error<S: AsRef<str>>(msg: S) {
        eprintln!("{} {}", Colors::error("[ERROR]"), msg.as_ref());
    }

    pub fn success<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::success(&format!("[{}]", APP_NAME)), msg.as_ref());
    }
}

/// 安装 tracing 订阅器
///
/// 过滤规则优先读取 `CAPSFIX_LOG`，否则为 `warn`，详细模式下为 `debug`。
pub fn init_tracing(verbose: bool, colored: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(colored)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
