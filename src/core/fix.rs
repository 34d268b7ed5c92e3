// ============================================================================
// CapsFix - 修复规则
// ============================================================================
//
// 文件: src/core/fix.rs
// 职责: 修复规则的定义、构造校验与漏洞关联校验
// 边界:
//   - ✅ 翻译键 / 转换器 / 版本约束 / 语言约束 / 漏洞键
//   - ✅ 构造时将转换器规范化为单条链
//   - ✅ 适用性判断（版本 + 语言）
//   - ✅ 与漏洞追踪系统交叉校验（纯函数，返回警告列表）
//   - ❌ 不应包含翻译文本生成逻辑
//   - ❌ 不应包含网络实现
//
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::core::error::{BugValidationError, FixError, VersionError};
use crate::core::transformer::{MultiTransformer, SharedTransformer, Transformer};
use crate::core::versions::VersionResolver;
use crate::models::bug::BugReport;
use crate::models::language::LanguageId;
use crate::models::version::VersionSpecifier;
use crate::providers::BugTracker;

/// 漏洞键格式 `[A-Z]+-\d+`，例如 `MC-226454`
pub fn is_valid_bug_key(key: &str) -> bool {
    let Some((project, number)) = key.split_once('-') else {
        return false;
    };
    !project.is_empty()
        && project.chars().all(|c| c.is_ascii_uppercase())
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

/// 修复规则，构造后不可变
#[derive(Clone)]
pub struct Fix {
    key: String,
    transformer: SharedTransformer,
    versions: Option<VersionSpecifier>,
    languages: Option<Vec<LanguageId>>,
    bug: Option<String>,
}

/// 修复规则构造器
pub struct FixBuilder {
    key: String,
    transformers: Vec<SharedTransformer>,
    versions: Option<VersionSpecifier>,
    languages: Option<Vec<LanguageId>>,
    bug: Option<String>,
}

impl FixBuilder {
    pub fn versions(mut self, versions: impl Into<VersionSpecifier>) -> Self {
        self.versions = Some(versions.into());
        self
    }

    pub fn maybe_versions(mut self, versions: Option<VersionSpecifier>) -> Self {
        self.versions = versions;
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<LanguageId>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn bug(mut self, bug: impl Into<String>) -> Self {
        self.bug = Some(bug.into());
        self
    }

    pub fn maybe_bug(mut self, bug: Option<String>) -> Self {
        self.bug = bug;
        self
    }

    /// 校验并将转换器列表规范化为一条链
    pub fn build(self) -> Result<Fix, FixError> {
        if self.key.is_empty() {
            return Err(FixError::EmptyKey);
        }
        if let Some(bug) = &self.bug {
            if !is_valid_bug_key(bug) {
                return Err(FixError::MalformedBugKey {
                    key: self.key,
                    bug: bug.clone(),
                });
            }
        }

        Ok(Fix {
            key: self.key,
            transformer: Arc::new(MultiTransformer::new(self.transformers)),
            versions: self.versions,
            languages: self.languages,
            bug: self.bug,
        })
    }
}

impl Fix {
    /// 单个转换器
    pub fn new(key: impl Into<String>, transformer: SharedTransformer) -> FixBuilder {
        Self::chain(key, vec![transformer])
    }

    /// 按顺序执行的多个转换器
    pub fn chain(key: impl Into<String>, transformers: Vec<SharedTransformer>) -> FixBuilder {
        FixBuilder {
            key: key.into(),
            transformers,
            versions: None,
            languages: None,
            bug: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer.as_ref()
    }

    pub fn versions(&self) -> Option<&VersionSpecifier> {
        self.versions.as_ref()
    }

    pub fn languages(&self) -> Option<&[LanguageId]> {
        self.languages.as_deref()
    }

    pub fn bug(&self) -> Option<&str> {
        self.bug.as_deref()
    }

    /// 返回漏洞键替换后的副本，用于处理工单重定向
    pub fn with_bug(&self, bug: impl Into<String>) -> Fix {
        Fix {
            bug: Some(bug.into()),
            ..self.clone()
        }
    }

    pub fn applies_to_language(&self, language: &str) -> bool {
        match &self.languages {
            Some(languages) => languages.iter().any(|l| l == language),
            None => true,
        }
    }

    pub fn is_version_constrained(&self) -> bool {
        self.versions
            .as_ref()
            .is_some_and(VersionSpecifier::is_constrained)
    }

    /// 是否适用于指定 (版本, 语言)
    pub async fn applies_to(
        &self,
        resolver: &VersionResolver,
        version: &str,
        language: &str,
    ) -> Result<bool, VersionError> {
        if !self.applies_to_language(language) {
            return Ok(false);
        }
        match &self.versions {
            Some(versions) => resolver.includes(versions, version).await,
            None => Ok(true),
        }
    }

    /// 与漏洞追踪系统交叉校验
    ///
    /// 不修改规则本身：重定向后的规范键与建议性警告通过返回值交给调用方。
    pub async fn validate_linked_bug(
        &self,
        tracker: &dyn BugTracker,
        resolver: &VersionResolver,
    ) -> Result<BugValidation, BugValidationError> {
        let Some(bug) = &self.bug else {
            return Ok(BugValidation::default());
        };
        if !is_valid_bug_key(bug) {
            return Err(BugValidationError::MalformedBugKey(bug.clone()));
        }

        let report = tracker
            .lookup(bug)
            .await?
            .ok_or_else(|| BugValidationError::BugNotFound {
                key: self.key.clone(),
                bug: bug.clone(),
            })?;

        let mut warnings = Vec::new();

        if report.key != *bug {
            warnings.push(format!(
                "Bug {} linked to {} redirects to {}; update the fix to use the new key",
                bug, self.key, report.key
            ));
        }

        if let Some(resolution) = report.resolution {
            if resolution.is_inappropriate() {
                return Err(BugValidationError::InappropriateResolution {
                    key: self.key.clone(),
                    bug: report.key.clone(),
                    resolution,
                });
            }
            if resolution.is_fixed() {
                warnings.extend(self.fixed_bug_warnings(&report, resolver).await?);
            }
        }

        Ok(BugValidation {
            canonical_bug: Some(report.key),
            warnings,
        })
    }

    async fn fixed_bug_warnings(
        &self,
        report: &BugReport,
        resolver: &VersionResolver,
    ) -> Result<Vec<String>, VersionError> {
        let mut warnings = Vec::new();

        let versions = match &self.versions {
            Some(versions) if versions.is_constrained() => versions,
            _ => {
                warnings.push(format!(
                    "Bug {} is resolved as fixed but {} has no version constraint",
                    report.key, self.key
                ));
                return Ok(warnings);
            }
        };

        let applicable = resolver.resolve(versions).await?;
        if applicable.is_empty() {
            warnings.push(format!(
                "Version constraint of {} resolves to no versions",
                self.key
            ));
            return Ok(warnings);
        }

        let catalog = resolver.catalog().await?;
        let earliest = |ids: &[String]| ids.iter().filter_map(|id| catalog.find_version_index(id)).min();

        if let Some(first_fixed) = earliest(report.fix_versions.as_slice()) {
            let redundant = applicable
                .iter()
                .filter_map(|id| catalog.find_version_index(id))
                .filter(|&index| index >= first_fixed)
                .count();
            if redundant > 0 {
                warnings.push(format!(
                    "{} applies to {} version(s) in which {} is already fixed",
                    self.key, redundant, report.key
                ));
            }
        }

        if let (Some(first_affected), Some(first_applicable)) =
            (earliest(report.affects_versions.as_slice()), earliest(applicable.as_slice()))
        {
            if first_applicable < first_affected {
                warnings.push(format!(
                    "{} applies to {}, which is older than the earliest version affected by {}",
                    self.key,
                    catalog.versions()[first_applicable].id,
                    report.key
                ));
            }
        }

        Ok(warnings)
    }
}

impl fmt::Debug for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fix")
            .field("key", &self.key)
            .field("transformer", &self.transformer.name())
            .field("versions", &self.versions)
            .field("languages", &self.languages)
            .field("bug", &self.bug)
            .finish()
    }
}

/// 漏洞关联校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugValidation {
    /// 工单的规范键；规则未关联工单时为 `None`
    pub canonical_bug: Option<String>,
    /// 建议性警告，不阻止构建
    pub warnings: Vec<String>,
}
