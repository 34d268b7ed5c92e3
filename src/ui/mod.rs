// ============================================================================
// CapsFix - UI 模块
// ============================================================================
//
// 文件: src/ui/mod.rs
// 职责: 终端界面组件导出
// 边界:
//   - ✅ 子模块声明
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod progress;
pub mod spinner;
pub mod summary;
