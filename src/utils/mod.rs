// ============================================================================
// CapsFix - 工具模块
// ============================================================================
//
// 文件: src/utils/mod.rs
// 职责: 通用工具子模块导出
// 边界:
//   - ✅ 子模块声明
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod colors;
pub mod constants;
pub mod logger;
pub mod styles;
