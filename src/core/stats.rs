// ============================================================================
// CapsFix - 修复统计
// ============================================================================
//
// 文件: src/core/stats.rs
// 职责: 统计修复规则覆盖的工单与翻译键
// 边界:
//   - ✅ 按版本与语言过滤规则
//   - ✅ 工单与翻译键去重计数
//   - ❌ 不应包含输出格式化
//
// ============================================================================

use std::collections::BTreeSet;

use crate::core::error::VersionError;
use crate::core::fix::Fix;
use crate::core::versions::VersionResolver;
use crate::models::language::LanguageId;
use crate::models::version::VersionSpecifier;

/// 统计过滤条件；字段为 `None` 表示不过滤
#[derive(Debug, Clone, Default)]
pub struct StatsFilter {
    pub versions: Option<VersionSpecifier>,
    pub languages: Option<Vec<LanguageId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixStats {
    pub bug_reports: BTreeSet<String>,
    pub translation_keys: BTreeSet<String>,
}

impl FixStats {
    pub fn bug_report_count(&self) -> usize {
        self.bug_reports.len()
    }

    pub fn translation_key_count(&self) -> usize {
        self.translation_keys.len()
    }
}

/// 统计在过滤条件下仍然生效的规则
///
/// 规则的版本约束与过滤版本有交集即视为生效；未约束的规则总是生效。
pub async fn generate_stats(
    fixes: &[Fix],
    filter: &StatsFilter,
    resolver: &VersionResolver,
) -> Result<FixStats, VersionError> {
    let versions = match &filter.versions {
        Some(specifier) => Some(resolver.resolve(specifier).await?),
        None => None,
    };

    let mut stats = FixStats::default();
    for fix in fixes {
        let version_match = match (&versions, fix.versions()) {
            (None, _) | (_, None) => true,
            (Some(_), Some(specifier)) if specifier.matches_every_version() => true,
            (Some(targets), Some(specifier)) => resolver
                .resolve(specifier)
                .await?
                .iter()
                .any(|version| targets.contains(version)),
        };

        let language_match = match (&filter.languages, fix.languages()) {
            (Some(targets), Some(languages)) => languages.iter().any(|l| targets.contains(l)),
            _ => true,
        };

        if !version_match || !language_match {
            continue;
        }

        if let Some(bug) = fix.bug() {
            stats.bug_reports.insert(bug.to_string());
        }
        stats.translation_keys.insert(fix.key().to_string());
    }

    tracing::debug!(
        bug_reports = stats.bug_report_count(),
        translation_keys = stats.translation_key_count(),
        "stats generated"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::core::transformers::OverrideTransformer;
    use crate::models::version::VersionBranch;
    use crate::providers::fake::StaticVersionSource;
    use std::sync::Arc;

    fn resolver() -> VersionResolver {
        VersionResolver::new(
            Arc::new(StaticVersionSource::from_ids(&["1.19.3", "1.19.4", "1.20", "23w31a"])),
            Arc::new(MemoryCache::new()),
        )
    }

    fn fixes() -> Vec<Fix> {
        let fix = |key: &str| Fix::new(key, Arc::new(OverrideTransformer::new("x")));
        vec![
            fix("gui.yes").bug("MC-1").build().unwrap(),
            fix("gui.no").bug("MC-1").build().unwrap(),
            fix("old.key")
                .bug("MC-2")
                .versions(VersionSpecifier::between(None, Some("1.20")))
                .build()
                .unwrap(),
            fix("gb.key").languages(["en_gb"]).build().unwrap(),
        ]
    }

    #[tokio::test]
    async fn unfiltered_counts_everything() {
        let stats = generate_stats(&fixes(), &StatsFilter::default(), &resolver())
            .await
            .unwrap();
        assert_eq!(stats.bug_report_count(), 2);
        assert_eq!(stats.translation_key_count(), 4);
    }

    #[tokio::test]
    async fn version_filter_drops_expired_fixes() {
        let filter = StatsFilter {
            versions: Some(VersionSpecifier::latest(VersionBranch::Snapshot)),
            ..StatsFilter::default()
        };
        let stats = generate_stats(&fixes(), &filter, &resolver()).await.unwrap();
        assert!(!stats.translation_keys.contains("old.key"));
        assert_eq!(stats.bug_reports.iter().collect::<Vec<_>>(), vec!["MC-1"]);
    }

    #[tokio::test]
    async fn language_filter_drops_other_languages() {
        let filter = StatsFilter {
            languages: Some(vec!["en_us".to_string()]),
            ..StatsFilter::default()
        };
        let stats = generate_stats(&fixes(), &filter, &resolver()).await.unwrap();
        assert!(!stats.translation_keys.contains("gb.key"));
        assert_eq!(stats.translation_key_count(), 3);
    }
}
