// ============================================================================
// CapsFix - 构建编排器
// ============================================================================
//
// 文件: src/core/builder.rs
// 职责: 在 版本 × 语言 矩阵上并发执行生成与漏洞校验
// 边界:
//   - ✅ 版本说明符解析为目标版本列表
//   - ✅ 生成任务的并发调度与结果汇总
//   - ✅ 修复规则的漏洞关联校验（运行到结束）
//   - ✅ 规范漏洞键的重定向应用
//   - ❌ 不应包含单个键的转换逻辑
//   - ❌ 不应包含资源包写入
//   - ❌ 不应包含 UI 显示逻辑
//
// ============================================================================

use std::sync::Arc;

use crate::core::error::GenerateError;
use crate::core::fix::Fix;
use crate::core::generator::TranslationGenerator;
use crate::core::scheduler::{AsyncTaskScheduler, SchedulerConfig, TaskResult};
use crate::core::versions::VersionResolver;
use crate::models::language::{LanguageFileBundle, LanguageFileData, LanguageId};
use crate::models::version::{VersionId, VersionSpecifier};
use crate::providers::BugTracker;

/// 构建编排器
///
/// 每个 (版本, 语言) 是一个独立任务，任务之间不共享可变状态。
/// 任意任务失败都会终止整个构建，不产出部分结果。
pub struct BuildOrchestrator {
    generator: Arc<TranslationGenerator>,
    scheduler_config: SchedulerConfig,
}

impl BuildOrchestrator {
    pub fn new(generator: Arc<TranslationGenerator>) -> Self {
        Self {
            generator,
            scheduler_config: SchedulerConfig::default(),
        }
    }

    pub fn with_scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler_config = config;
        self
    }

    pub fn generator(&self) -> &Arc<TranslationGenerator> {
        &self.generator
    }

    /// 解析目标版本
    pub async fn target_versions(&self, versions: &VersionSpecifier) -> Result<Vec<VersionId>, GenerateError> {
        Ok(self.generator.resolver().resolve(versions).await?)
    }

    /// 为所有目标版本与语言生成修改后的语言文件
    pub async fn generate(
        &self,
        versions: &VersionSpecifier,
        languages: &[LanguageId],
        fixes: Arc<Vec<Fix>>,
    ) -> Result<LanguageFileBundle, GenerateError> {
        let targets = self.target_versions(versions).await?;
        tracing::debug!(
            versions = targets.len(),
            languages = languages.len(),
            fixes = fixes.len(),
            "generation started"
        );

        let mut tasks = Vec::with_capacity(targets.len() * languages.len());
        for version in &targets {
            for language in languages {
                let generator = Arc::clone(&self.generator);
                let fixes = Arc::clone(&fixes);
                let version = version.clone();
                let language = language.clone();
                let task_id = format!("{}/{}", version, language);
                tasks.push((
                    task_id,
                    async move {
                        generator
                            .generate(&version, &language, &fixes)
                            .await
                            .map(|generated| (version, language, generated.data))
                    },
                ));
            }
        }

        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            fail_fast: true,
            ..self.scheduler_config.clone()
        });
        let results = scheduler.execute_batch(tasks).await;

        collect_bundle(&targets, results)
    }
}

/// 汇总任务结果；优先报告真正的失败，其次才是超时或取消
fn collect_bundle(
    targets: &[VersionId],
    results: Vec<(String, TaskResult<(VersionId, LanguageId, LanguageFileData), GenerateError>)>,
) -> Result<LanguageFileBundle, GenerateError> {
    let mut bundle = LanguageFileBundle::new();
    for version in targets {
        bundle.entry(version.clone()).or_default();
    }

    let mut interrupted: Option<GenerateError> = None;
    for (task, result) in results {
        match result {
            TaskResult::Success((version, language, data)) => {
                bundle.entry(version).or_default().insert(language, data);
            }
            TaskResult::Failed(error) => return Err(error),
            TaskResult::Timeout => {
                interrupted.get_or_insert(GenerateError::Task {
                    task,
                    message: "timed out".to_string(),
                });
            }
            TaskResult::Cancelled => {
                interrupted.get_or_insert(GenerateError::Task {
                    task,
                    message: "cancelled".to_string(),
                });
            }
        }
    }

    match interrupted {
        Some(error) => Err(error),
        None => Ok(bundle),
    }
}

/// 工单重定向：规则关联的旧键被追踪系统映射到新的规范键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugRedirect {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// 单条规则的校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub key: String,
    pub bug: String,
    pub message: String,
}

/// 漏洞关联校验汇总
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// 实际查询过的规则数量
    pub checked: usize,
    pub redirects: Vec<BugRedirect>,
    pub warnings: Vec<String>,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 校验所有关联了工单的修复规则
///
/// 不会在第一个失败处停止，所有错误都会被收集并记录。
pub async fn validate_fixes(
    fixes: &[Fix],
    tracker: Arc<dyn BugTracker>,
    resolver: Arc<VersionResolver>,
    config: SchedulerConfig,
) -> ValidationReport {
    let mut tasks = Vec::new();
    let mut linked = Vec::new();

    for (index, fix) in fixes.iter().enumerate() {
        let Some(bug) = fix.bug() else {
            continue;
        };
        linked.push((fix.key().to_string(), bug.to_string()));

        let fix = fix.clone();
        let tracker = Arc::clone(&tracker);
        let resolver = Arc::clone(&resolver);
        tasks.push((
            format!("{}#{}", fix.key(), index),
            async move { fix.validate_linked_bug(tracker.as_ref(), &resolver).await },
        ));
    }

    let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
        fail_fast: false,
        ..config
    });
    let results = scheduler.execute_batch(tasks).await;

    let mut report = ValidationReport {
        checked: linked.len(),
        ..ValidationReport::default()
    };

    for ((key, bug), (_, result)) in linked.into_iter().zip(results) {
        let message = match result {
            TaskResult::Success(validation) => {
                for warning in &validation.warnings {
                    tracing::warn!(key = %key, bug = %bug, "{}", warning);
                }
                report.warnings.extend(validation.warnings);
                if let Some(canonical) = validation.canonical_bug {
                    if canonical != bug {
                        report.redirects.push(BugRedirect {
                            key: key.clone(),
                            from: bug.clone(),
                            to: canonical,
                        });
                    }
                }
                continue;
            }
            TaskResult::Failed(error) => error.to_string(),
            TaskResult::Timeout => "bug lookup timed out".to_string(),
            TaskResult::Cancelled => "bug lookup was cancelled".to_string(),
        };

        tracing::error!(key = %key, bug = %bug, "{}", message);
        report.failures.push(ValidationFailure { key, bug, message });
    }

    report
}

/// 将校验得到的规范工单键写回规则列表，返回新的列表
pub fn apply_redirects(fixes: &[Fix], redirects: &[BugRedirect]) -> Vec<Fix> {
    fixes
        .iter()
        .map(|fix| {
            let redirect = redirects
                .iter()
                .find(|r| r.key == fix.key() && fix.bug() == Some(r.from.as_str()));
            match redirect {
                Some(redirect) => fix.with_bug(redirect.to.clone()),
                None => fix.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::core::transformers::{CustomTransformer, OverrideTransformer, ReplaceTransformer};
    use crate::models::bug::Resolution;
    use crate::providers::fake::{bug_report, StaticBugTracker, StaticLanguageFiles, StaticVersionSource};

    fn resolver() -> Arc<VersionResolver> {
        Arc::new(VersionResolver::new(
            Arc::new(StaticVersionSource::from_ids(&["1.19.3", "1.19.4", "23w12a"])),
            Arc::new(MemoryCache::new()),
        ))
    }

    fn orchestrator() -> BuildOrchestrator {
        let mut files = StaticLanguageFiles::new();
        for version in ["1.19.3", "1.19.4", "23w12a"] {
            for language in ["en_us", "en_gb"] {
                files = files.with_file(
                    version,
                    language,
                    &[("gui.yes", "Yes"), ("tip", "sneak or jump")],
                );
            }
        }
        let generator = TranslationGenerator::new(resolver(), Arc::new(files));
        BuildOrchestrator::new(Arc::new(generator))
    }

    fn languages() -> Vec<LanguageId> {
        vec!["en_us".to_string(), "en_gb".to_string()]
    }

    #[tokio::test]
    async fn bundle_covers_every_version_and_language() {
        let fixes = vec![
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("Yes!")))
                .build()
                .unwrap(),
            Fix::new("tip", Arc::new(ReplaceTransformer::new(" or", ", or")))
                .versions(VersionSpecifier::between(Some("1.19.4"), None))
                .build()
                .unwrap(),
        ];

        let bundle = orchestrator()
            .generate(
                &VersionSpecifier::between(Some("1.19.3"), None),
                &languages(),
                Arc::new(fixes),
            )
            .await
            .unwrap();

        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["1.19.3", "1.19.4", "23w12a"]);
        for languages in bundle.values() {
            assert_eq!(languages.len(), 2);
        }
        assert!(!bundle["1.19.3"]["en_us"].contains_key("tip"));
        assert_eq!(bundle["1.19.4"]["en_gb"]["tip"], "sneak, or jump");
        assert_eq!(bundle["23w12a"]["en_us"]["gui.yes"], "Yes!");
    }

    #[tokio::test]
    async fn empty_specifier_builds_nothing() {
        let bundle = orchestrator()
            .generate(&VersionSpecifier::default(), &languages(), Arc::new(Vec::new()))
            .await
            .unwrap();
        assert!(bundle.is_empty());
    }

    #[tokio::test]
    async fn any_failing_task_aborts_the_build() {
        let fixes = vec![Fix::new("test.key", Arc::new(CustomTransformer::new(|_| String::new())))
            .build()
            .unwrap()];

        let error = orchestrator()
            .generate(&VersionSpecifier::from("1.19.4"), &languages(), Arc::new(fixes))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("test.key"), "{error}");
    }

    #[tokio::test]
    async fn validation_runs_to_completion() {
        let tracker = StaticBugTracker::new()
            .with_redirect("MC-1", bug_report("MC-2", None, &[], &["1.19.3"]))
            .with_report(bug_report("MC-3", Some(Resolution::Invalid), &[], &[]));
        let fixes = vec![
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("a")))
                .bug("MC-1")
                .build()
                .unwrap(),
            Fix::new("gui.no", Arc::new(OverrideTransformer::new("b")))
                .bug("MC-3")
                .build()
                .unwrap(),
            Fix::new("gui.done", Arc::new(OverrideTransformer::new("c")))
                .bug("MC-404")
                .build()
                .unwrap(),
            Fix::new("gui.cancel", Arc::new(OverrideTransformer::new("d")))
                .build()
                .unwrap(),
        ];

        let report = validate_fixes(&fixes, Arc::new(tracker), resolver(), SchedulerConfig::default()).await;

        assert_eq!(report.checked, 3);
        assert!(!report.is_success());
        assert_eq!(
            report.redirects,
            vec![BugRedirect {
                key: "gui.yes".to_string(),
                from: "MC-1".to_string(),
                to: "MC-2".to_string(),
            }]
        );
        let failed: Vec<&str> = report.failures.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(failed, vec!["gui.no", "gui.done"]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn redirects_update_matching_fixes_only() {
        let fixes = vec![
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("a")))
                .bug("MC-1")
                .build()
                .unwrap(),
            Fix::new("gui.no", Arc::new(OverrideTransformer::new("b")))
                .bug("MC-5")
                .build()
                .unwrap(),
        ];
        let redirects = vec![BugRedirect {
            key: "gui.yes".to_string(),
            from: "MC-1".to_string(),
            to: "MC-2".to_string(),
        }];

        let updated = apply_redirects(&fixes, &redirects);
        assert_eq!(updated[0].bug(), Some("MC-2"));
        assert_eq!(updated[1].bug(), Some("MC-5"));
        assert_eq!(fixes[0].bug(), Some("MC-1"));
    }
}
