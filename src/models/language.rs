// ============================================================================
// CapsFix - 语言文件数据模型
// ============================================================================
//
// 文件: src/models/language.rs
// 职责: 语言文件与构建产物的数据结构定义
// 边界:
//   - ✅ 翻译键到翻译文本的映射类型
//   - ✅ 多版本多语言的结果集合类型
//   - ❌ 不应包含语言文件下载逻辑
//   - ❌ 不应包含翻译修改逻辑
//
// ============================================================================

use std::collections::BTreeMap;

use crate::models::version::VersionId;

/// 单个语言 ID，例如 `en_us`
pub type LanguageId = String;

/// 语言文件：翻译键到翻译文本的映射
pub type LanguageFileData = BTreeMap<String, String>;

/// 版本 → 语言 → 语言文件
///
/// ```json
/// {
///   "1.14.4": {
///     "en_us": { "gui.yes": "Yes", "gui.no": "No" },
///     "en_gb": { ... }
///   },
///   "1.15.1": { ... }
/// }
/// ```
pub type LanguageFileBundle = BTreeMap<VersionId, BTreeMap<LanguageId, LanguageFileData>>;

/// 参照语言，未变化检查只对该语言生效
pub const REFERENCE_LANGUAGE: &str = "en_us";
