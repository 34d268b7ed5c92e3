// ============================================================================
// CapsFix - Core 核心模块
// ============================================================================
//
// 文件: src/core/mod.rs
// 职责: 核心业务逻辑模块入口和导出
// 边界:
//   - ✅ 核心子模块导出
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含具体业务实现
//   - ❌ 不应包含 CLI 相关逻辑
//   - ❌ 不应包含 UI 相关逻辑
//
// ============================================================================

pub mod builder;
pub mod cache;
pub mod error;
pub mod fix;
pub mod generator;
pub mod groups;
pub mod logger;
pub mod pack;
pub mod scheduler;
pub mod search;
pub mod stats;
pub mod text;
pub mod transformer;
pub mod transformers;
pub mod versions;

// 重新导出常用类型
pub use builder::{apply_redirects, validate_fixes, BuildOrchestrator, ValidationReport};
pub use cache::{Cache, FileCache, MemoryCache};
pub use fix::Fix;
pub use generator::TranslationGenerator;
pub use scheduler::{AsyncTaskScheduler, SchedulerConfig, TaskResult as SchedulerTaskResult};
pub use transformer::{MultiTransformer, SharedTransformer, TransformContext, Transformer};
pub use versions::{VersionCatalog, VersionResolver};
