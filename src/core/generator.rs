// ============================================================================
// CapsFix - 翻译文本生成器
// ============================================================================
//
// 文件: src/core/generator.rs
// 职责: 为单个 (版本, 语言) 生成修改后的翻译文本
// 边界:
//   - ✅ 过滤适用的修复规则
//   - ✅ 原版文本与后备文本查找
//   - ✅ 执行转换器链并检测空结果
//   - ✅ 重复键与未变化结果的警告
//   - ✅ 转换器日志转发到 tracing
//   - ❌ 不应包含多版本多语言调度
//   - ❌ 不应包含资源包写入
//
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{GenerateError, TransformError};
use crate::core::fix::Fix;
use crate::core::logger::{MessageType, TransformerLogger};
use crate::core::transformer::TransformContext;
use crate::core::versions::VersionResolver;
use crate::models::language::{LanguageFileData, LanguageId, REFERENCE_LANGUAGE};
use crate::models::version::VersionBranch;
use crate::providers::LanguageFileSource;

/// 翻译文本生成器
pub struct TranslationGenerator {
    resolver: Arc<VersionResolver>,
    language_files: Arc<dyn LanguageFileSource>,
    fallback_language: LanguageId,
}

impl TranslationGenerator {
    pub fn new(resolver: Arc<VersionResolver>, language_files: Arc<dyn LanguageFileSource>) -> Self {
        Self {
            resolver,
            language_files,
            fallback_language: REFERENCE_LANGUAGE.to_string(),
        }
    }

    pub fn with_fallback_language(mut self, language: impl Into<LanguageId>) -> Self {
        self.fallback_language = language.into();
        self
    }

    pub fn resolver(&self) -> &Arc<VersionResolver> {
        &self.resolver
    }

    /// 生成 (版本, 语言) 的修改结果，只包含被修复的键
    ///
    /// 修复规则按列表顺序执行，同一个键后出现的规则覆盖先出现的。
    /// 重复键与未变化结果作为警告随结果返回，不会中断生成。
    pub async fn generate(
        &self,
        version: &str,
        language: &str,
        fixes: &[Fix],
    ) -> Result<GeneratedLanguageFile, GenerateError> {
        let vanilla = match self.language_files.language_file(version, language).await? {
            Some(data) => data,
            None => {
                tracing::debug!(version, language, "no vanilla language file, relying on fallbacks");
                LanguageFileData::new()
            }
        };

        let mut applicable = Vec::new();
        for fix in fixes {
            if fix.applies_to(&self.resolver, version, language).await? {
                applicable.push(fix);
            }
        }

        let mut warnings = duplicate_warnings(version, language, &applicable);

        let mut output = LanguageFileData::new();
        for fix in applicable {
            let old_value = self.old_value(fix.key(), version, language, &vanilla).await?;
            let value = self
                .apply_fix(fix, old_value.as_deref(), version, language, &vanilla)
                .await?;
            output.insert(fix.key().to_string(), value);
        }

        if language == REFERENCE_LANGUAGE {
            for (key, value) in &output {
                if vanilla.get(key) == Some(value) {
                    tracing::warn!(version, language, key = %key, "fix result is identical to the vanilla string");
                    warnings.push(GenerationWarning::UnchangedFromVanilla { key: key.clone() });
                }
            }
        }

        Ok(GeneratedLanguageFile {
            data: output,
            warnings,
        })
    }

    /// 原版文本，依次尝试：本语言、同版本的后备语言、最新快照中的本语言
    async fn old_value(
        &self,
        key: &str,
        version: &str,
        language: &str,
        vanilla: &LanguageFileData,
    ) -> Result<Option<String>, GenerateError> {
        if let Some(value) = vanilla.get(key) {
            return Ok(Some(value.clone()));
        }

        if language != self.fallback_language {
            if let Some(value) = self.lookup(key, version, &self.fallback_language).await? {
                tracing::debug!(version, language, key, fallback = %self.fallback_language, "using fallback language value");
                return Ok(Some(value));
            }
        }

        let catalog = self.resolver.catalog().await?;
        let latest = catalog.latest(VersionBranch::Snapshot);
        if latest != version {
            if let Some(value) = self.lookup(key, latest, language).await? {
                tracing::debug!(version, language, key, latest, "using value from the latest snapshot");
                return Ok(Some(value));
            }
        }

        Err(GenerateError::MissingTranslationString {
            key: key.to_string(),
            version: version.to_string(),
            language: language.to_string(),
        })
    }

    async fn lookup(&self, key: &str, version: &str, language: &str) -> Result<Option<String>, GenerateError> {
        Ok(self
            .language_files
            .language_file(version, language)
            .await?
            .and_then(|data| data.get(key).cloned()))
    }

    async fn apply_fix(
        &self,
        fix: &Fix,
        old_value: Option<&str>,
        version: &str,
        language: &str,
        vanilla: &LanguageFileData,
    ) -> Result<String, GenerateError> {
        let logger = TransformerLogger::new();
        let ctx = TransformContext {
            key: fix.key(),
            old_value,
            language,
            version,
            language_file_data: vanilla,
            language_files: self.language_files.as_ref(),
            logger: &logger,
        };

        let result = fix.transformer().apply(&ctx).await;
        replay(&logger, fix, version, language);

        match result?.value {
            Some(value) if value.is_empty() => Err(ctx.empty_result(fix.transformer().name()).into()),
            Some(value) => Ok(value),
            None => Err(TransformError::NoTransformerOutput {
                key: fix.key().to_string(),
            }
            .into()),
        }
    }
}

/// 生成过程中的非致命问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationWarning {
    /// 同一个键被多个规则修改；`occurrence` 从 2 开始计数
    DuplicateKey { key: String, occurrence: usize },
    /// `en_us` 的结果与原版完全相同
    UnchangedFromVanilla { key: String },
}

/// 单个 (版本, 语言) 的生成结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedLanguageFile {
    pub data: LanguageFileData,
    pub warnings: Vec<GenerationWarning>,
}

/// 每个重复出现的键产生一条警告
fn duplicate_warnings(version: &str, language: &str, fixes: &[&Fix]) -> Vec<GenerationWarning> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut warnings = Vec::new();
    for fix in fixes {
        let count = seen.entry(fix.key()).or_insert(0);
        *count += 1;
        if *count > 1 {
            tracing::warn!(
                version,
                language,
                key = fix.key(),
                occurrence = *count,
                "multiple fixes target the same key; the last one wins"
            );
            warnings.push(GenerationWarning::DuplicateKey {
                key: fix.key().to_string(),
                occurrence: *count,
            });
        }
    }
    warnings
}

/// 将转换器日志中的警告与错误转发到 tracing
fn replay(logger: &TransformerLogger, fix: &Fix, version: &str, language: &str) {
    let transformer = fix.transformer().name();
    for message in logger.messages() {
        match message.kind {
            MessageType::Info => {
                tracing::debug!(version, language, transformer, key = fix.key(), "{}", message.message)
            }
            MessageType::Warn => {
                tracing::warn!(version, language, transformer, key = fix.key(), "[{} {}] {}", version, language, message.message)
            }
            MessageType::Error => {
                tracing::error!(version, language, transformer, key = fix.key(), "[{} {}] {}", version, language, message.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryCache;
    use crate::core::transformer::SharedTransformer;
    use crate::core::transformers::{
        CapitaliseFromTranslationStringsTransformer, CustomTransformer, OverrideTransformer,
        ReplaceTransformer,
    };
    use crate::models::version::VersionSpecifier;
    use crate::providers::fake::{StaticLanguageFiles, StaticVersionSource};

    fn generator(files: StaticLanguageFiles) -> TranslationGenerator {
        let resolver = VersionResolver::new(
            Arc::new(StaticVersionSource::from_ids(&["1.19.3", "1.19.4", "23w12a"])),
            Arc::new(MemoryCache::new()),
        );
        TranslationGenerator::new(Arc::new(resolver), Arc::new(files))
    }

    fn append(suffix: &'static str) -> SharedTransformer {
        Arc::new(CustomTransformer::named("Append", move |ctx| {
            format!("{}{}", ctx.old_value.unwrap_or_default(), suffix)
        }))
    }

    #[tokio::test]
    async fn chain_applies_in_order() {
        let files = StaticLanguageFiles::new().with_file("1.19.4", "en_us", &[("gui.yes", "Yes")]);
        let fixes = vec![Fix::chain("gui.yes", vec![append("!"), append("?")]).build().unwrap()];

        let output = generator(files).generate("1.19.4", "en_us", &fixes).await.unwrap().data;
        assert_eq!(output.get("gui.yes").map(String::as_str), Some("Yes!?"));
        assert_eq!(output.len(), 1);
    }

    #[tokio::test]
    async fn replace_scenario() {
        let files = StaticLanguageFiles::new().with_file(
            "1.19.4",
            "en_us",
            &[("advancements.adventure.avoid_vibration.description", "Sneak near a Sculk Sensor or Warden to prevent it from detecting you")],
        );
        let fixes = vec![Fix::new(
            "advancements.adventure.avoid_vibration.description",
            Arc::new(ReplaceTransformer::new(" or", ", or")),
        )
        .build()
        .unwrap()];

        let output = generator(files).generate("1.19.4", "en_us", &fixes).await.unwrap().data;
        assert_eq!(
            output["advancements.adventure.avoid_vibration.description"],
            "Sneak near a Sculk Sensor, or Warden to prevent it from detecting you"
        );
    }

    #[tokio::test]
    async fn empty_result_aborts_with_key() {
        let files = StaticLanguageFiles::new().with_file("1.19.4", "en_us", &[("test.key", "Value")]);
        let empty: SharedTransformer = Arc::new(CustomTransformer::new(|_| String::new()));
        let fixes = vec![Fix::new("test.key", empty).build().unwrap()];

        let error = generator(files)
            .generate("1.19.4", "en_us", &fixes)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            GenerateError::Transform(TransformError::EmptyTransformResult { .. })
        ));
        assert!(error.to_string().contains("test.key"));
    }

    #[tokio::test]
    async fn filters_by_version_and_language() {
        let files = StaticLanguageFiles::new()
            .with_file("1.19.4", "en_us", &[("gui.yes", "Yes"), ("gui.no", "No")])
            .with_file("1.19.4", "en_gb", &[("gui.yes", "Yes"), ("gui.no", "No")]);
        let fixes = vec![
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("Yep")))
                .versions(VersionSpecifier::between(None, Some("1.19.4")))
                .build()
                .unwrap(),
            Fix::new("gui.no", Arc::new(OverrideTransformer::new("Nope")))
                .languages(["en_gb"])
                .build()
                .unwrap(),
        ];
        let generator = generator(files);

        let us = generator.generate("1.19.4", "en_us", &fixes).await.unwrap().data;
        assert!(us.is_empty());

        let gb = generator.generate("1.19.4", "en_gb", &fixes).await.unwrap().data;
        assert_eq!(gb.get("gui.no").map(String::as_str), Some("Nope"));
        assert!(!gb.contains_key("gui.yes"));
    }

    #[tokio::test]
    async fn last_duplicate_wins() {
        let files = StaticLanguageFiles::new().with_file("1.19.4", "en_us", &[("gui.yes", "Yes")]);
        let fixes = vec![
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("First"))).build().unwrap(),
            Fix::new("gui.yes", Arc::new(OverrideTransformer::new("Second"))).build().unwrap(),
        ];
        let generated = generator(files).generate("1.19.4", "en_us", &fixes).await.unwrap();
        assert_eq!(generated.data["gui.yes"], "Second");
        assert_eq!(
            generated.warnings,
            vec![GenerationWarning::DuplicateKey {
                key: "gui.yes".to_string(),
                occurrence: 2,
            }]
        );
    }

    #[tokio::test]
    async fn missing_value_falls_back_then_fails() {
        let files = StaticLanguageFiles::new()
            .with_file("1.19.4", "en_gb", &[])
            .with_file("1.19.4", "en_us", &[("gui.fallback", "From US")])
            .with_file("23w12a", "en_gb", &[("gui.new", "Brand new")]);
        let fixes = vec![
            Fix::new("gui.fallback", append("!")).build().unwrap(),
            Fix::new("gui.new", append("?")).build().unwrap(),
        ];
        let generator = generator(files);

        let output = generator.generate("1.19.4", "en_gb", &fixes).await.unwrap().data;
        assert_eq!(output["gui.fallback"], "From US!");
        assert_eq!(output["gui.new"], "Brand new?");

        let missing = vec![Fix::new("gui.nowhere", append("!")).build().unwrap()];
        assert!(matches!(
            generator.generate("1.19.4", "en_gb", &missing).await,
            Err(GenerateError::MissingTranslationString { key, .. }) if key == "gui.nowhere"
        ));
    }

    #[tokio::test]
    async fn auto_capitalise_uses_vanilla_names() {
        let files = StaticLanguageFiles::new().with_file(
            "1.19.4",
            "en_us",
            &[("block.minecraft.dirt", "Dirt"), ("tip.dirt", "place a dirt block")],
        );
        let transformer: SharedTransformer =
            Arc::new(CapitaliseFromTranslationStringsTransformer::new(["block.minecraft.*"]));
        let fixes = vec![Fix::new("tip.dirt", transformer).build().unwrap()];

        let output = generator(files).generate("1.19.4", "en_us", &fixes).await.unwrap().data;
        assert_eq!(output["tip.dirt"], "place a Dirt block");
    }

    #[tokio::test]
    async fn unchanged_results_are_not_errors() {
        let files = StaticLanguageFiles::new().with_file("1.19.4", "en_us", &[("gui.yes", "Yes")]);
        let fixes = vec![Fix::new("gui.yes", Arc::new(ReplaceTransformer::new("zzz", "x")))
            .build()
            .unwrap()];
        let generator = generator(files);
        let generated = generator.generate("1.19.4", "en_us", &fixes).await.unwrap();
        assert_eq!(generated.data["gui.yes"], "Yes");
        assert_eq!(fixes[0].transformer().name(), "Multi");
        assert_eq!(
            generated.warnings,
            vec![GenerationWarning::UnchangedFromVanilla {
                key: "gui.yes".to_string()
            }]
        );

        let changed = vec![Fix::new("gui.yes", Arc::new(OverrideTransformer::new("Yes!")))
            .build()
            .unwrap()];
        let generated = generator.generate("1.19.4", "en_us", &changed).await.unwrap();
        assert!(generated.warnings.is_empty());
    }

    #[tokio::test]
    async fn unchanged_lint_only_checks_the_reference_language() {
        let files = StaticLanguageFiles::new().with_file("1.19.4", "en_gb", &[("gui.yes", "Yes")]);
        let fixes = vec![Fix::new("gui.yes", Arc::new(ReplaceTransformer::new("zzz", "x")))
            .build()
            .unwrap()];
        let generated = generator(files).generate("1.19.4", "en_gb", &fixes).await.unwrap();
        assert!(generated.warnings.is_empty());
    }
}
