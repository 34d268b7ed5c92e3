// ============================================================================
// CapsFix - 数据模型模块
// ============================================================================
//
// 文件: src/models/mod.rs
// 职责: 数据模型子模块导出
// 边界:
//   - ✅ 子模块声明
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod bug;
pub mod config;
pub mod language;
pub mod version;
