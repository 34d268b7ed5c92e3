// ============================================================================
// CapsFix - 文本样式工具
// ============================================================================
//
// 文件: src/utils/styles.rs
// 职责: 终端文本样式（粗体 / 下划线）
// 边界:
//   - ✅ 文本样式格式化
//   - ❌ 不应包含颜色主题
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

use colored::Colorize;

/// 文本样式工具函数
pub struct TextStyles;

impl TextStyles {
    /// 粗体文本
    pub fn bold(text: &str) -> String {
        text.bold().to_string()
    }

    /// 下划线文本
    pub fn underline(text: &str) -> String {
        text.underline().to_string()
    }
}
