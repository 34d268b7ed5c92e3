// ============================================================================
// CapsFix - 常量定义
// ============================================================================
//
// 文件: src/utils/constants.rs
// 职责: 应用程序常量定义
// 边界:
//   - ✅ 应用程序常量定义
//   - ✅ 图标与进度条字符定义
//   - ❌ 不应包含动态配置
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

/// 应用名称常量
pub const APP_NAME: &str = "CAPSFIX";

/// tracing 过滤规则的环境变量
pub const LOG_ENV: &str = "CAPSFIX_LOG";

/// 像素风格图标
pub mod icons {
    /// 构建图标
    pub const BUILD: &str = "▓";
    /// 成功图标
    pub const SUCCESS: &str = "✓";
    /// 错误图标
    pub const ERROR: &str = "✗";
    /// 警告图标
    pub const WARNING: &str = "!";
    /// 包图标
    pub const PACKAGE: &str = "●";
    /// 检查图标
    pub const CHECK: &str = "◆";
    /// 箭头图标
    pub const ARROW: &str = "→";
    /// 汇总图标
    pub const SUMMARY: &str = "◈";
    /// 时间图标
    pub const TIME: &str = "⧖";
}

/// 进度条字符
pub mod progress_chars {
    /// indicatif 进度条字符：已完成、当前、未完成
    pub const BAR: &str = "█▓░";
}

/// 加载 spinner 字符
pub mod spinner_chars {
    pub const BASE: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
}
