// ============================================================================
// CapsFix - 库入口
// ============================================================================
//
// 文件: src/lib.rs
// 职责: 模块声明
// 边界:
//   - ✅ 顶层模块导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod cli;
pub mod core;
pub mod fixes;
pub mod i18n;
pub mod models;
pub mod providers;
pub mod ui;
pub mod utils;
