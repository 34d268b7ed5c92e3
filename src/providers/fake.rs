// ============================================================================
// CapsFix - 测试用内存数据源
// ============================================================================
//
// 文件: src/providers/fake.rs
// 职责: 为单元测试提供固定数据的外部能力实现
// 边界:
//   - ✅ 固定版本清单
//   - ✅ 固定语言文件
//   - ✅ 固定漏洞报告
//   - ❌ 不应出现在非测试代码中
//
// ============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::error::SourceError;
use crate::models::bug::{BugReport, Resolution, Status};
use crate::models::language::LanguageFileData;
use crate::models::version::{LatestVersions, VersionManifest, VersionMetadata};
use crate::providers::{BugTracker, LanguageFileSource, VersionManifestSource};

/// 按从旧到新的 ID 列表构造清单，形如 `1.19` / `1.19.4` 的 ID 视为正式版
pub fn manifest(ids: &[&str]) -> VersionManifest {
    let is_release = |id: &str| {
        let parts: Vec<&str> = id.split('.').collect();
        (2..=3).contains(&parts.len())
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    };

    let versions: Vec<VersionMetadata> = ids
        .iter()
        .rev()
        .map(|id| VersionMetadata {
            id: id.to_string(),
            kind: if is_release(id) { "release" } else { "snapshot" }.to_string(),
            release_time: None,
        })
        .collect();

    let release = ids
        .iter()
        .rev()
        .find(|id| is_release(id))
        .or_else(|| ids.last())
        .map(|id| id.to_string())
        .unwrap_or_default();
    let snapshot = ids.last().map(|id| id.to_string()).unwrap_or_default();

    VersionManifest {
        latest: LatestVersions { release, snapshot },
        versions,
    }
}

/// 固定版本清单
pub struct StaticVersionSource {
    manifest: VersionManifest,
    fetches: AtomicUsize,
}

impl StaticVersionSource {
    pub fn new(manifest: VersionManifest) -> Self {
        Self {
            manifest,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn from_ids(ids: &[&str]) -> Self {
        Self::new(manifest(ids))
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionManifestSource for StaticVersionSource {
    async fn fetch_manifest(&self) -> Result<VersionManifest, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.manifest.clone())
    }
}

/// 固定语言文件
#[derive(Default)]
pub struct StaticLanguageFiles {
    files: HashMap<(String, String), LanguageFileData>,
    fetches: AtomicUsize,
}

impl StaticLanguageFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, version: &str, language: &str, entries: &[(&str, &str)]) -> Self {
        let data = entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.files
            .insert((version.to_string(), language.to_string()), data);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageFileSource for StaticLanguageFiles {
    async fn language_file(
        &self,
        version: &str,
        language: &str,
    ) -> Result<Option<LanguageFileData>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .get(&(version.to_string(), language.to_string()))
            .cloned())
    }
}

/// 固定漏洞报告
#[derive(Default)]
pub struct StaticBugTracker {
    reports: HashMap<String, BugReport>,
}

impl StaticBugTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, report: BugReport) -> Self {
        self.reports.insert(report.key.clone(), report);
        self
    }

    /// 查询 `from` 时返回规范键为 `report.key` 的报告
    pub fn with_redirect(mut self, from: &str, report: BugReport) -> Self {
        self.reports.insert(from.to_string(), report);
        self
    }
}

#[async_trait]
impl BugTracker for StaticBugTracker {
    async fn lookup(&self, key: &str) -> Result<Option<BugReport>, SourceError> {
        Ok(self.reports.get(key).cloned())
    }
}

/// 构造漏洞报告
pub fn bug_report(
    key: &str,
    resolution: Option<Resolution>,
    fix_versions: &[&str],
    affects_versions: &[&str],
) -> BugReport {
    BugReport {
        key: key.to_string(),
        resolution,
        status: if resolution.is_some() {
            Status::Resolved
        } else {
            Status::Open
        },
        fix_versions: fix_versions.iter().map(|v| v.to_string()).collect(),
        affects_versions: affects_versions.iter().map(|v| v.to_string()).collect(),
    }
}
