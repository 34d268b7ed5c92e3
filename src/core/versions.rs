// ============================================================================
// CapsFix - 版本解析器
// ============================================================================
//
// 文件: src/core/versions.rs
// 职责: 将版本说明符解析为按时间排序的版本 ID 列表
// 边界:
//   - ✅ 版本目录（从旧到新）与索引查询
//   - ✅ 单个版本 / latest / 数字版本解析
//   - ✅ 简单区间与复合区间 (include / exclude / filter) 计算
//   - ✅ 愚人节版本过滤
//   - ✅ 通过缓存能力读取版本清单
//   - ❌ 不应包含网络请求实现
//   - ❌ 不应包含修复规则逻辑
//
// ============================================================================

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::core::cache::Cache;
use crate::core::error::{SourceError, VersionError};
use crate::models::version::{
    LatestVersions, SingleVersionSpecifier, VersionBranch, VersionId, VersionManifest,
    VersionMetadata, VersionRange, VersionSpecifier, VersionType,
};
use crate::providers::VersionManifestSource;

/// 愚人节版本，任何区间结果都不会包含它们
pub const JOKE_VERSIONS: &[&str] = &[
    "15w14a",
    "1.RV-Pre1",
    "3D Shareware v1.34",
    "20w14infinite",
    "22w13oneblockatatime",
    "23w13a_or_b",
    "24w14potato",
    "25w14craftmine",
];

/// 版本清单在缓存中的键
pub const MANIFEST_CACHE_KEY: &str = "version_manifest.json";

/// 按时间顺序（从旧到新）排列的版本目录
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    versions: Vec<VersionMetadata>,
    latest: LatestVersions,
    index: HashMap<VersionId, usize>,
}

impl VersionCatalog {
    /// 由启动器清单构造，清单原始顺序为从新到旧
    pub fn from_manifest(manifest: VersionManifest) -> Self {
        let mut versions = manifest.versions;
        versions.reverse();

        let index = versions
            .iter()
            .enumerate()
            .map(|(i, version)| (version.id.clone(), i))
            .collect();

        Self {
            versions,
            latest: manifest.latest,
            index,
        }
    }

    pub fn versions(&self) -> &[VersionMetadata] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn latest(&self, branch: VersionBranch) -> &str {
        match branch {
            VersionBranch::Release => &self.latest.release,
            VersionBranch::Snapshot => &self.latest.snapshot,
        }
    }

    /// 版本在目录中的位置，越新越大
    pub fn find_version_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn metadata(&self, id: &str) -> Option<&VersionMetadata> {
        self.find_version_index(id).map(|i| &self.versions[i])
    }

    /// 解析任意说明符，结果按时间顺序排列且不重复
    pub fn resolve(&self, specifier: &VersionSpecifier) -> Result<Vec<VersionId>, VersionError> {
        let indices = self.resolve_indices(specifier)?;
        Ok(indices
            .into_iter()
            .map(|i| self.versions[i].id.clone())
            .collect())
    }

    /// 解析单个版本，版本不存在时返回 `UnknownVersion`
    pub fn resolve_single(
        &self,
        specifier: &SingleVersionSpecifier,
    ) -> Result<VersionId, VersionError> {
        let index = self.single_index(specifier)?;
        Ok(self.versions[index].id.clone())
    }

    /// 解析单个版本，版本不存在时返回 `fallback`
    pub fn resolve_single_or(&self, specifier: &SingleVersionSpecifier, fallback: &str) -> VersionId {
        self.resolve_single(specifier)
            .unwrap_or_else(|_| fallback.to_string())
    }

    fn single_index(&self, specifier: &SingleVersionSpecifier) -> Result<usize, VersionError> {
        let id = match specifier {
            SingleVersionSpecifier::Id(id) => id.clone(),
            SingleVersionSpecifier::Latest(target) => self.latest(target.latest).to_string(),
            SingleVersionSpecifier::Numeric(version) => version.to_string(),
        };
        self.find_version_index(&id)
            .ok_or(VersionError::UnknownVersion(id))
    }

    fn resolve_indices(&self, specifier: &VersionSpecifier) -> Result<BTreeSet<usize>, VersionError> {
        match specifier {
            VersionSpecifier::Single(single) => Ok(BTreeSet::from([self.single_index(single)?])),
            VersionSpecifier::Range(range) => self.range_indices(range),
        }
    }

    fn range_indices(&self, range: &VersionRange) -> Result<BTreeSet<usize>, VersionError> {
        if let Some(only) = &range.only {
            return Ok(BTreeSet::from([self.single_index(only)?]));
        }

        // 完全为空或只有 include 的区间以空集为基础
        let mut indices = if range.is_unconstrained() && !range.narrows_catalog() {
            BTreeSet::new()
        } else {
            self.simple_range(
                range.start.as_ref(),
                range.end.as_ref(),
                range.exclusive_start,
                range.exclusive_end,
            )?
        };

        // 先排除再包含，同时出现在两者中的版本会被保留
        for excluded in &range.exclude {
            for i in self.resolve_indices(excluded)? {
                indices.remove(&i);
            }
        }
        for included in &range.include {
            indices.extend(self.resolve_indices(included)?);
        }

        if let Some(filter) = range.filter {
            indices.retain(|&i| matches_type(&self.versions[i], filter));
        }

        Ok(indices)
    }

    fn simple_range(
        &self,
        start: Option<&SingleVersionSpecifier>,
        end: Option<&SingleVersionSpecifier>,
        exclusive_start: bool,
        exclusive_end: bool,
    ) -> Result<BTreeSet<usize>, VersionError> {
        let mut start_index = match start {
            Some(specifier) => self.single_index(specifier)?,
            None => 0,
        };
        let mut end_index = match end {
            Some(specifier) => self.single_index(specifier)?,
            None => self.versions.len(),
        } + 1;

        if exclusive_start && start.is_some() {
            start_index += 1;
        }
        if exclusive_end {
            end_index -= 1;
        }

        if end_index < start_index {
            return Err(VersionError::InvalidRange {
                start: start.map(ToString::to_string).unwrap_or_default(),
                end: end.map(ToString::to_string).unwrap_or_default(),
            });
        }

        let len = self.versions.len();
        Ok((start_index.min(len)..end_index.min(len))
            .filter(|&i| !JOKE_VERSIONS.contains(&self.versions[i].id.as_str()))
            .collect())
    }
}

/// 判断版本是否属于指定类型
pub fn matches_type(version: &VersionMetadata, filter: VersionType) -> bool {
    match filter {
        VersionType::Release => version.is_release(),
        VersionType::Development => !version.is_release(),
        VersionType::Snapshot => is_weekly_snapshot(&version.id),
        VersionType::PreRelease => has_numbered_suffix(&version.id, "-pre"),
        VersionType::ReleaseCandidate => has_numbered_suffix(&version.id, "-rc"),
    }
}

/// 形如 `23w07a` 的周快照
fn is_weekly_snapshot(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 6
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'w'
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_lowercase()
}

/// 以 `marker` 加数字结尾，例如 `1.19.4-pre1`
fn has_numbered_suffix(id: &str, marker: &str) -> bool {
    match id.rfind(marker) {
        Some(position) => {
            let number = &id[position + marker.len()..];
            !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// 版本解析器
///
/// 版本目录在首次使用时通过缓存加载，之后在解析器生命周期内复用。
pub struct VersionResolver {
    source: Arc<dyn VersionManifestSource>,
    cache: Arc<dyn Cache>,
    catalog: OnceCell<Arc<VersionCatalog>>,
}

impl VersionResolver {
    pub fn new(source: Arc<dyn VersionManifestSource>, cache: Arc<dyn Cache>) -> Self {
        Self {
            source,
            cache,
            catalog: OnceCell::new(),
        }
    }

    /// 获取版本目录
    pub async fn catalog(&self) -> Result<Arc<VersionCatalog>, VersionError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let manifest = self.load_manifest().await?;
                tracing::debug!(versions = manifest.versions.len(), "loaded version manifest");
                Ok::<_, SourceError>(Arc::new(VersionCatalog::from_manifest(manifest)))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    async fn load_manifest(&self) -> Result<VersionManifest, SourceError> {
        if let Some(cached) = self.cache.get(MANIFEST_CACHE_KEY).await {
            match serde_json::from_str::<VersionManifest>(&cached) {
                Ok(manifest) => return Ok(manifest),
                Err(error) => {
                    tracing::debug!(%error, "cached version manifest is unreadable, refetching");
                }
            }
        }

        let manifest = self.source.fetch_manifest().await?;
        self.cache
            .set(MANIFEST_CACHE_KEY, serde_json::to_string(&manifest)?)
            .await;
        Ok(manifest)
    }

    pub async fn resolve(&self, specifier: &VersionSpecifier) -> Result<Vec<VersionId>, VersionError> {
        self.catalog().await?.resolve(specifier)
    }

    pub async fn resolve_single(
        &self,
        specifier: &SingleVersionSpecifier,
    ) -> Result<VersionId, VersionError> {
        self.catalog().await?.resolve_single(specifier)
    }

    pub async fn resolve_single_or(
        &self,
        specifier: &SingleVersionSpecifier,
        fallback: &str,
    ) -> Result<VersionId, VersionError> {
        Ok(self.catalog().await?.resolve_single_or(specifier, fallback))
    }

    /// 说明符是否覆盖指定版本，未约束且不收窄的区间无需加载目录即可匹配
    pub async fn includes(&self, specifier: &VersionSpecifier, version: &str) -> Result<bool, VersionError> {
        if specifier.matches_every_version() {
            return Ok(true);
        }
        Ok(self.resolve(specifier).await?.iter().any(|id| id == version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::models::version::NumericVersion;
    use crate::providers::fake::{manifest, StaticVersionSource};

    fn catalog(ids: &[&str]) -> VersionCatalog {
        VersionCatalog::from_manifest(manifest(ids))
    }

    fn nineteen() -> VersionCatalog {
        catalog(&["1.19.1", "1.19.2", "1.19.3", "1.19.4", "1.19.5", "1.19.6"])
    }

    #[test]
    fn catalog_is_oldest_first() {
        let catalog = nineteen();
        assert_eq!(catalog.find_version_index("1.19.1"), Some(0));
        assert_eq!(catalog.find_version_index("1.19.6"), Some(5));
        assert_eq!(catalog.find_version_index("1.20"), None);
    }

    #[test]
    fn simple_range_excludes_end_by_default() {
        let range = VersionSpecifier::between(Some("1.19.3"), Some("1.19.5"));
        assert_eq!(nineteen().resolve(&range).unwrap(), vec!["1.19.3", "1.19.4"]);
    }

    #[test]
    fn open_ended_ranges() {
        let catalog = nineteen();
        assert_eq!(
            catalog.resolve(&VersionSpecifier::between(Some("1.19.5"), None)).unwrap(),
            vec!["1.19.5", "1.19.6"]
        );
        assert_eq!(
            catalog.resolve(&VersionSpecifier::between(None, Some("1.19.3"))).unwrap(),
            vec!["1.19.1", "1.19.2"]
        );
    }

    #[test]
    fn exclusivity_can_be_overridden() {
        let range = VersionRange::new()
            .from_version("1.19.2")
            .until("1.19.4")
            .exclusive_start(true)
            .exclusive_end(false);
        assert_eq!(
            nineteen().resolve(&range.into()).unwrap(),
            vec!["1.19.3", "1.19.4"]
        );
    }

    #[test]
    fn reversed_range_is_invalid() {
        let range = VersionSpecifier::between(Some("1.19.5"), Some("1.19.2"));
        assert!(matches!(
            nineteen().resolve(&range),
            Err(VersionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn empty_specifier_resolves_to_nothing() {
        assert!(nineteen().resolve(&VersionSpecifier::default()).unwrap().is_empty());
    }

    #[test]
    fn open_bounds_cover_the_whole_catalog_when_narrowed() {
        let catalog = catalog(&["1.19.3", "23w03a", "1.19.4-pre1", "1.19.4"]);

        let releases = VersionRange::new().with_filter(VersionType::Release);
        assert_eq!(catalog.resolve(&releases.into()).unwrap(), vec!["1.19.3", "1.19.4"]);

        let without_snapshot = VersionRange::new().with_exclude("23w03a");
        assert_eq!(
            catalog.resolve(&without_snapshot.into()).unwrap(),
            vec!["1.19.3", "1.19.4-pre1", "1.19.4"]
        );

        let included_only = VersionRange::new().with_include("1.19.4-pre1");
        assert_eq!(catalog.resolve(&included_only.into()).unwrap(), vec!["1.19.4-pre1"]);
    }

    #[test]
    fn unknown_literal_fails_unless_fallback_given() {
        let catalog = nineteen();
        assert!(matches!(
            catalog.resolve(&VersionSpecifier::from("1.7.10")),
            Err(VersionError::UnknownVersion(id)) if id == "1.7.10"
        ));
        assert_eq!(catalog.resolve_single_or(&"1.7.10".into(), "1.19.6"), "1.19.6");
        assert_eq!(catalog.resolve_single_or(&"1.19.2".into(), "1.19.6"), "1.19.2");
    }

    #[test]
    fn joke_versions_never_appear_in_ranges() {
        let catalog = catalog(&["23w12a", "23w13a", "23w13a_or_b", "23w14a"]);
        assert_eq!(
            catalog.resolve(&VersionSpecifier::between(Some("23w12a"), None)).unwrap(),
            vec!["23w12a", "23w13a", "23w14a"]
        );
    }

    #[test]
    fn include_wins_over_exclude() {
        let range = VersionRange::new()
            .from_version("1.19.1")
            .until("1.19.4")
            .with_exclude(VersionSpecifier::between(Some("1.19.2"), Some("1.19.4")))
            .with_include("1.19.2")
            .with_include("1.19.6");
        assert_eq!(
            nineteen().resolve(&range.into()).unwrap(),
            vec!["1.19.1", "1.19.2", "1.19.6"]
        );
    }

    #[test]
    fn overlapping_includes_do_not_duplicate() {
        let range = VersionRange::new()
            .with_include(VersionSpecifier::between(Some("1.19.2"), Some("1.19.5")))
            .with_include(VersionSpecifier::between(Some("1.19.3"), Some("1.19.6")));
        assert_eq!(
            nineteen().resolve(&range.into()).unwrap(),
            vec!["1.19.2", "1.19.3", "1.19.4", "1.19.5"]
        );
    }

    #[test]
    fn only_short_circuits_other_fields() {
        let mut range = VersionRange::only("1.19.4").from_version("1.19.1");
        range.exclude.push("1.19.4".into());
        assert_eq!(nineteen().resolve(&range.into()).unwrap(), vec!["1.19.4"]);
    }

    #[test]
    fn type_filters() {
        let catalog = catalog(&[
            "1.19.3",
            "23w03a",
            "1.19.4-pre1",
            "1.19.4-rc1",
            "1.19.4",
        ]);
        let all = VersionRange::new().from_version("1.19.3").exclusive_end(false);
        let run = |filter| catalog.resolve(&all.clone().with_filter(filter).into()).unwrap();

        assert_eq!(run(VersionType::Release), vec!["1.19.3", "1.19.4"]);
        assert_eq!(run(VersionType::Development), vec!["23w03a", "1.19.4-pre1", "1.19.4-rc1"]);
        assert_eq!(run(VersionType::Snapshot), vec!["23w03a"]);
        assert_eq!(run(VersionType::PreRelease), vec!["1.19.4-pre1"]);
        assert_eq!(run(VersionType::ReleaseCandidate), vec!["1.19.4-rc1"]);
    }

    #[test]
    fn latest_and_numeric_specifiers() {
        let catalog = catalog(&["1.19.4", "23w12a", "1.20-pre1"]);
        assert_eq!(
            catalog.resolve(&VersionSpecifier::latest(VersionBranch::Snapshot)).unwrap(),
            vec!["1.20-pre1"]
        );
        assert_eq!(
            catalog.resolve(&VersionSpecifier::latest(VersionBranch::Release)).unwrap(),
            vec!["1.19.4"]
        );
        assert_eq!(
            catalog
                .resolve(&NumericVersion::new(1, 20, 0).pre(1).into())
                .unwrap(),
            vec!["1.20-pre1"]
        );
    }

    #[tokio::test]
    async fn resolver_reads_manifest_once_and_caches_it() {
        let source = Arc::new(StaticVersionSource::from_ids(&["1.19.3", "1.19.4"]));
        let cache = Arc::new(MemoryCache::new());
        let resolver = VersionResolver::new(source.clone(), cache.clone());

        assert_eq!(resolver.resolve(&"1.19.4".into()).await.unwrap(), vec!["1.19.4"]);
        assert_eq!(resolver.resolve(&"1.19.3".into()).await.unwrap(), vec!["1.19.3"]);
        assert_eq!(source.fetch_count(), 1);
        assert!(cache.get(MANIFEST_CACHE_KEY).await.is_some());
    }

    #[tokio::test]
    async fn corrupt_cached_manifest_is_refetched() {
        let source = Arc::new(StaticVersionSource::from_ids(&["1.19.3"]));
        let cache = Arc::new(MemoryCache::new());
        cache.set(MANIFEST_CACHE_KEY, "[".to_string()).await;
        let resolver = VersionResolver::new(source.clone(), cache);

        assert_eq!(resolver.catalog().await.unwrap().len(), 1);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn unconstrained_specifiers_include_everything_without_loading() {
        let source = Arc::new(StaticVersionSource::from_ids(&["1.19.3"]));
        let resolver = VersionResolver::new(source.clone(), Arc::new(MemoryCache::new()));

        let unconstrained = VersionSpecifier::default();
        assert!(resolver.includes(&unconstrained, "9.9.9").await.unwrap());
        assert_eq!(source.fetch_count(), 0);

        let excluded: VersionSpecifier = VersionRange::new().with_exclude("1.19.3").into();
        assert!(!resolver.includes(&excluded, "1.19.3").await.unwrap());
        assert_eq!(source.fetch_count(), 1);

        assert!(resolver.includes(&"1.19.3".into(), "1.19.3").await.unwrap());
        assert!(!resolver
            .includes(&VersionSpecifier::between(None, Some("1.19.3")), "1.19.3")
            .await
            .unwrap());
    }
}
