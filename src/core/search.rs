// ============================================================================
// CapsFix - 搜索值解析
// ============================================================================
//
// 文件: src/core/search.rs
// 职责: 字面量或延迟查找的搜索值 / 替换值定义与解析
// 边界:
//   - ✅ 字面字符串与正则模式
//   - ✅ 同步延迟查找（当前语言文件）
//   - ✅ 异步延迟查找（通过语言文件能力读取原版文本）
//   - ✅ 文本与翻译键混排的模板
//   - ✅ 替换值（字符串 / 延迟值 / 回调）
//   - ❌ 不应包含具体转换逻辑
//   - ❌ 不应包含网络实现
//
// ============================================================================

use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::core::error::SearchValueError;
use crate::models::language::{LanguageFileData, LanguageId};
use crate::providers::LanguageFileSource;

/// 已解析的搜索模式
#[derive(Debug, Clone)]
pub enum SearchPattern {
    /// 字面字符串
    Text(String),
    /// 正则表达式，`global` 为 false 时只处理第一个匹配
    Regex { regex: Regex, global: bool },
}

impl SearchPattern {
    pub fn text(text: impl Into<String>) -> Self {
        SearchPattern::Text(text.into())
    }

    /// 全局正则
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(SearchPattern::Regex {
            regex: Regex::new(source)?,
            global: true,
        })
    }

    /// 只替换第一个匹配的正则
    pub fn first(source: &str) -> Result<Self, regex::Error> {
        Ok(SearchPattern::Regex {
            regex: Regex::new(source)?,
            global: false,
        })
    }

    /// 作为正则源码使用，字面字符串会被转义
    pub fn to_regex_source(&self) -> String {
        match self {
            SearchPattern::Text(text) => regex::escape(text),
            SearchPattern::Regex { regex, .. } => regex.as_str().to_string(),
        }
    }

    /// 作为纯文本使用
    pub fn as_text(&self) -> &str {
        match self {
            SearchPattern::Text(text) => text,
            SearchPattern::Regex { regex, .. } => regex.as_str(),
        }
    }

    /// 在 `haystack[from..]` 中查找，返回字节区间
    pub fn find_from(&self, haystack: &str, from: usize) -> Option<(usize, usize)> {
        if from > haystack.len() {
            return None;
        }
        match self {
            SearchPattern::Text(text) => haystack
                .get(from..)
                .and_then(|rest| rest.find(text.as_str()))
                .map(|i| (from + i, from + i + text.len())),
            SearchPattern::Regex { regex, .. } => {
                regex.find_at(haystack, from).map(|m| (m.start(), m.end()))
            }
        }
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPattern::Text(text) => write!(f, "\"{}\"", text),
            SearchPattern::Regex { regex, .. } => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for SearchPattern {
    fn from(text: &str) -> Self {
        SearchPattern::Text(text.to_string())
    }
}

impl From<Regex> for SearchPattern {
    fn from(regex: Regex) -> Self {
        SearchPattern::Regex {
            regex,
            global: true,
        }
    }
}

/// 同步延迟查找，只能读取当前语言文件
pub type SyncResolve =
    Arc<dyn Fn(&LanguageFileData) -> Result<SearchPattern, SearchValueError> + Send + Sync>;

/// 异步延迟查找
#[async_trait]
pub trait AsyncSearchValue: Send + Sync {
    async fn resolve(
        &self,
        language: &str,
        version: &str,
        language_files: &dyn LanguageFileSource,
    ) -> Result<SearchPattern, SearchValueError>;

    fn describe(&self) -> String;
}

/// 可能依赖上下文的搜索值
#[derive(Clone)]
pub enum FlexibleSearchValue {
    Literal(SearchPattern),
    DeferredSync(SyncResolve),
    DeferredAsync(Arc<dyn AsyncSearchValue>),
}

impl FlexibleSearchValue {
    /// 读取当前语言文件中 `key` 的文本
    pub fn from_language_file(key: impl Into<String>) -> Self {
        let key = key.into();
        FlexibleSearchValue::DeferredSync(Arc::new(move |data: &LanguageFileData| {
            data.get(&key)
                .map(|value| SearchPattern::Text(value.clone()))
                .ok_or_else(|| SearchValueError::MissingTranslationKey {
                    key: key.clone(),
                    language: String::new(),
                    version: String::new(),
                })
        }))
    }

    /// 读取目标版本原版语言文件中 `key` 的文本
    pub fn translation_string(key: impl Into<String>) -> Self {
        FlexibleSearchValue::DeferredAsync(Arc::new(UseTranslationString::new(key)))
    }

    pub fn template(template: LangTemplate) -> Self {
        FlexibleSearchValue::DeferredAsync(Arc::new(template))
    }

    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(FlexibleSearchValue::Literal(SearchPattern::regex(source)?))
    }
}

impl fmt::Debug for FlexibleSearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleSearchValue::Literal(pattern) => write!(f, "Literal({})", pattern),
            FlexibleSearchValue::DeferredSync(_) => write!(f, "DeferredSync"),
            FlexibleSearchValue::DeferredAsync(value) => {
                write!(f, "DeferredAsync({})", value.describe())
            }
        }
    }
}

impl From<&str> for FlexibleSearchValue {
    fn from(text: &str) -> Self {
        FlexibleSearchValue::Literal(SearchPattern::from(text))
    }
}

impl From<String> for FlexibleSearchValue {
    fn from(text: String) -> Self {
        FlexibleSearchValue::Literal(SearchPattern::Text(text))
    }
}

impl From<Regex> for FlexibleSearchValue {
    fn from(regex: Regex) -> Self {
        FlexibleSearchValue::Literal(SearchPattern::from(regex))
    }
}

impl From<SearchPattern> for FlexibleSearchValue {
    fn from(pattern: SearchPattern) -> Self {
        FlexibleSearchValue::Literal(pattern)
    }
}

/// 解析搜索值
pub async fn resolve_search_value(
    value: &FlexibleSearchValue,
    data: &LanguageFileData,
    language: &str,
    version: &str,
    language_files: &dyn LanguageFileSource,
) -> Result<SearchPattern, SearchValueError> {
    match value {
        FlexibleSearchValue::Literal(pattern) => Ok(pattern.clone()),
        FlexibleSearchValue::DeferredSync(resolve) => resolve(data).map_err(|error| match error {
            SearchValueError::MissingTranslationKey { key, .. } => {
                SearchValueError::MissingTranslationKey {
                    key,
                    language: language.to_string(),
                    version: version.to_string(),
                }
            }
            other => other,
        }),
        FlexibleSearchValue::DeferredAsync(deferred) => {
            deferred.resolve(language, version, language_files).await
        }
    }
}

async fn lookup_translation(
    key: &str,
    language: &str,
    version: &str,
    language_files: &dyn LanguageFileSource,
) -> Result<String, SearchValueError> {
    language_files
        .language_file(version, language)
        .await?
        .and_then(|data| data.get(key).cloned())
        .ok_or_else(|| SearchValueError::MissingTranslationKey {
            key: key.to_string(),
            language: language.to_string(),
            version: version.to_string(),
        })
}

/// 原版翻译文本查找，可指定读取另一种语言
#[derive(Debug, Clone)]
pub struct UseTranslationString {
    key: String,
    language: Option<LanguageId>,
}

impl UseTranslationString {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: None,
        }
    }

    pub fn in_language(mut self, language: impl Into<LanguageId>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[async_trait]
impl AsyncSearchValue for UseTranslationString {
    async fn resolve(
        &self,
        language: &str,
        version: &str,
        language_files: &dyn LanguageFileSource,
    ) -> Result<SearchPattern, SearchValueError> {
        let language = self.language.as_deref().unwrap_or(language);
        let value = lookup_translation(&self.key, language, version, language_files).await?;
        Ok(SearchPattern::Text(value))
    }

    fn describe(&self) -> String {
        format!("translation string {}", self.key)
    }
}

/// 模板片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangPart {
    Text(String),
    Key(String),
}

/// 文本与翻译键混排的模板，解析为单个字面字符串
#[derive(Debug, Clone, Default)]
pub struct LangTemplate {
    parts: Vec<LangPart>,
}

impl LangTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(LangPart::Text(text.into()));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.parts.push(LangPart::Key(key.into()));
        self
    }
}

#[async_trait]
impl AsyncSearchValue for LangTemplate {
    async fn resolve(
        &self,
        language: &str,
        version: &str,
        language_files: &dyn LanguageFileSource,
    ) -> Result<SearchPattern, SearchValueError> {
        let mut output = String::new();
        for part in &self.parts {
            match part {
                LangPart::Text(text) => output.push_str(text),
                LangPart::Key(key) => {
                    output.push_str(&lookup_translation(key, language, version, language_files).await?)
                }
            }
        }
        Ok(SearchPattern::Text(output))
    }

    fn describe(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                LangPart::Text(text) => text.clone(),
                LangPart::Key(key) => format!("{{{}}}", key),
            })
            .collect()
    }
}

/// 替换回调：参数为匹配到的子串与捕获组
pub type ReplacerFn = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;

/// 替换值
#[derive(Clone)]
pub enum Replacer {
    Text(String),
    Deferred(FlexibleSearchValue),
    Function(ReplacerFn),
}

impl Replacer {
    pub fn function(callback: impl Fn(&str, &[String]) -> String + Send + Sync + 'static) -> Self {
        Replacer::Function(Arc::new(callback))
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacer::Text(text) => write!(f, "Text({:?})", text),
            Replacer::Deferred(value) => write!(f, "Deferred({:?})", value),
            Replacer::Function(_) => write!(f, "Function"),
        }
    }
}

impl From<&str> for Replacer {
    fn from(text: &str) -> Self {
        Replacer::Text(text.to_string())
    }
}

impl From<String> for Replacer {
    fn from(text: String) -> Self {
        Replacer::Text(text)
    }
}

impl From<FlexibleSearchValue> for Replacer {
    fn from(value: FlexibleSearchValue) -> Self {
        Replacer::Deferred(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fake::StaticLanguageFiles;

    fn data(entries: &[(&str, &str)]) -> LanguageFileData {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn literal_values_resolve_to_themselves() {
        let files = StaticLanguageFiles::new();
        let pattern = resolve_search_value(&"dirt".into(), &data(&[]), "en_us", "1.19.4", &files)
            .await
            .unwrap();
        assert_eq!(pattern.as_text(), "dirt");
    }

    #[tokio::test]
    async fn sync_lookup_reads_context_data() {
        let files = StaticLanguageFiles::new();
        let value = FlexibleSearchValue::from_language_file("block.minecraft.dirt");
        let context = data(&[("block.minecraft.dirt", "Dirt")]);

        let pattern = resolve_search_value(&value, &context, "en_us", "1.19.4", &files)
            .await
            .unwrap();
        assert_eq!(pattern.as_text(), "Dirt");

        let missing = resolve_search_value(&value, &data(&[]), "en_gb", "1.19.4", &files).await;
        assert!(matches!(
            missing,
            Err(SearchValueError::MissingTranslationKey { language, version, .. })
                if language == "en_gb" && version == "1.19.4"
        ));
    }

    #[tokio::test]
    async fn async_lookup_uses_language_file_source() {
        let files = StaticLanguageFiles::new()
            .with_file("1.19.4", "en_us", &[("item.minecraft.stick", "Stick")])
            .with_file("1.19.4", "de_de", &[("item.minecraft.stick", "Stock")]);

        let value = FlexibleSearchValue::translation_string("item.minecraft.stick");
        let pattern = resolve_search_value(&value, &data(&[]), "de_de", "1.19.4", &files)
            .await
            .unwrap();
        assert_eq!(pattern.as_text(), "Stock");

        let pinned = FlexibleSearchValue::DeferredAsync(Arc::new(
            UseTranslationString::new("item.minecraft.stick").in_language("en_us"),
        ));
        let pattern = resolve_search_value(&pinned, &data(&[]), "de_de", "1.19.4", &files)
            .await
            .unwrap();
        assert_eq!(pattern.as_text(), "Stick");
    }

    #[tokio::test]
    async fn template_interleaves_text_and_keys() {
        let files = StaticLanguageFiles::new().with_file(
            "1.19.4",
            "en_us",
            &[("key.jump", "Jump"), ("key.sneak", "Sneak")],
        );
        let template = LangTemplate::new()
            .text("Press ")
            .key("key.jump")
            .text(" or ")
            .key("key.sneak");
        assert_eq!(template.describe(), "Press {key.jump} or {key.sneak}");

        let pattern = resolve_search_value(
            &FlexibleSearchValue::template(template),
            &data(&[]),
            "en_us",
            "1.19.4",
            &files,
        )
        .await
        .unwrap();
        assert_eq!(pattern.as_text(), "Press Jump or Sneak");
    }

    #[test]
    fn find_from_searches_after_offset() {
        let text = SearchPattern::text("ab");
        assert_eq!(text.find_from("abxab", 1), Some((3, 5)));
        let regex = SearchPattern::regex("a.").unwrap();
        assert_eq!(regex.find_from("abxab", 1), Some((3, 5)));
        assert_eq!(text.find_from("abxab", 10), None);
    }
}
