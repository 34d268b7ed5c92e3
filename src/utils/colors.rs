// ============================================================================
// CapsFix - 颜色工具
// ============================================================================
//
// 文件: src/utils/colors.rs
// 职责: 终端颜色输出和主题管理
// 边界:
//   - ✅ 日志级别颜色主题
//   - ✅ 全局颜色开关
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含 UI 组件实现
//
// ============================================================================

use colored::{Color, Colorize};

/// 日志级别颜色主题
pub mod log_colors {
    use colored::Color;

    /// 信息日志颜色 (青色)
    pub const INFO: Color = Color::Cyan;

    /// 警告日志颜色 (黄色)
    pub const WARN: Color = Color::Yellow;

    /// 错误日志颜色 (红色)
    pub const ERROR: Color = Color::Red;

    /// 成功日志颜色 (绿色)
    pub const SUCCESS: Color = Color::Green;

    /// 次要信息颜色 (灰色)
    pub const MUTED: Color = Color::BrightBlack;
}

/// 颜色工具函数
pub struct Colors;

impl Colors {
    /// 全局开关；关闭后所有着色函数返回原文
    pub fn set_enabled(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// 为文本添加颜色
    pub fn colorize(text: &str, color: Color) -> String {
        text.color(color).to_string()
    }

    /// 信息颜色
    pub fn info(text: &str) -> String {
        Self::colorize(text, log_colors::INFO)
    }

    /// 警告颜色
    pub fn warn(text: &str) -> String {
        Self::colorize(text, log_colors::WARN)
    }

    /// 错误颜色
    pub fn error(text: &str) -> String {
        Self::colorize(text, log_colors::ERROR)
    }

    /// 成功颜色
    pub fn success(text: &str) -> String {
        Self::colorize(text, log_colors::SUCCESS)
    }

    pub fn muted(text: &str) -> String {
        Self::colorize(text, log_colors::MUTED)
    }
}
