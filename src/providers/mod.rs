// ============================================================================
// CapsFix - 外部数据源模块
// ============================================================================
//
// 文件: src/providers/mod.rs
// 职责: 外部能力接口定义与缓存包装
// 边界:
//   - ✅ 版本清单 / 语言文件 / 漏洞追踪能力接口
//   - ✅ 语言文件的读穿透缓存包装
//   - ✅ 子模块导出
//   - ❌ 不应包含版本解析算法
//   - ❌ 不应包含翻译修改逻辑
//
// ============================================================================

pub mod mojang;
pub mod mojira;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::cache::Cache;
use crate::core::error::SourceError;
use crate::models::bug::BugReport;
use crate::models::language::LanguageFileData;
use crate::models::version::VersionManifest;

pub use mojang::MojangClient;
pub use mojira::MojiraClient;

/// 版本清单来源
#[async_trait]
pub trait VersionManifestSource: Send + Sync {
    /// 获取原始清单（从新到旧）
    async fn fetch_manifest(&self) -> Result<VersionManifest, SourceError>;
}

/// 原版语言文件来源
#[async_trait]
pub trait LanguageFileSource: Send + Sync {
    /// 获取指定版本与语言的语言文件，不存在时返回 `None`
    async fn language_file(
        &self,
        version: &str,
        language: &str,
    ) -> Result<Option<LanguageFileData>, SourceError>;
}

/// 漏洞追踪系统
#[async_trait]
pub trait BugTracker: Send + Sync {
    /// 查询工单，不存在时返回 `None`
    async fn lookup(&self, key: &str) -> Result<Option<BugReport>, SourceError>;
}

/// 为语言文件来源加上缓存
///
/// 缓存键为 `<version>/<language>.json`。缓存内容无法解析时重新获取，
/// 未找到的结果不会被缓存。
pub struct CachedLanguageFiles {
    inner: Arc<dyn LanguageFileSource>,
    cache: Arc<dyn Cache>,
}

impl CachedLanguageFiles {
    pub fn new(inner: Arc<dyn LanguageFileSource>, cache: Arc<dyn Cache>) -> Self {
        Self { inner, cache }
    }

    fn cache_key(version: &str, language: &str) -> String {
        format!("{}/{}.json", version, language)
    }
}

#[async_trait]
impl LanguageFileSource for CachedLanguageFiles {
    async fn language_file(
        &self,
        version: &str,
        language: &str,
    ) -> Result<Option<LanguageFileData>, SourceError> {
        let key = Self::cache_key(version, language);

        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<LanguageFileData>(&cached) {
                Ok(data) => return Ok(Some(data)),
                Err(error) => {
                    tracing::debug!(%key, %error, "ignoring unreadable cache entry");
                }
            }
        }

        let fetched = self.inner.language_file(version, language).await?;
        if let Some(data) = &fetched {
            self.cache.set(&key, serde_json::to_string(data)?).await;
        }
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::providers::fake::StaticLanguageFiles;

    #[tokio::test]
    async fn cached_files_are_served_without_refetching() {
        let source = Arc::new(StaticLanguageFiles::new().with_file(
            "1.19.4",
            "en_us",
            &[("gui.yes", "Yes")],
        ));
        let cache = Arc::new(MemoryCache::new());
        let cached = CachedLanguageFiles::new(source.clone(), cache.clone());

        let first = cached.language_file("1.19.4", "en_us").await.unwrap();
        let second = cached.language_file("1.19.4", "en_us").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
        assert!(cache.get("1.19.4/en_us.json").await.is_some());
    }

    #[tokio::test]
    async fn corrupt_entries_fall_back_to_the_source() {
        let source = Arc::new(StaticLanguageFiles::new().with_file(
            "1.19.4",
            "en_us",
            &[("gui.no", "No")],
        ));
        let cache = Arc::new(MemoryCache::new());
        cache.set("1.19.4/en_us.json", "{not json".to_string()).await;
        let cached = CachedLanguageFiles::new(source.clone(), cache.clone());

        let data = cached.language_file("1.19.4", "en_us").await.unwrap().unwrap();
        assert_eq!(data.get("gui.no").map(String::as_str), Some("No"));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn missing_files_are_not_cached() {
        let source = Arc::new(StaticLanguageFiles::new());
        let cache = Arc::new(MemoryCache::new());
        let cached = CachedLanguageFiles::new(source, cache.clone());

        assert!(cached.language_file("1.19.4", "xx_xx").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }
}
