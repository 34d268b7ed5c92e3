// ============================================================================
// CapsFix - 内置转换器
// ============================================================================
//
// 文件: src/core/transformers.rs
// 职责: 内置文本转换器实现
// 边界:
//   - ✅ Override / Custom / Replace / ContextualReplace / RemoveWord
//   - ✅ TitleCase / CapitaliseSegment / CapitaliseSection
//   - ✅ CapitaliseFromTranslationStrings（按原版名称自动大写）
//   - ✅ PluralGuard（复数标记）
//   - ❌ 不应包含修复规则与版本过滤逻辑
//   - ❌ 不应包含语言文件获取实现
//
// ============================================================================

use async_trait::async_trait;
use regex::{Captures, NoExpand, Regex, Replacer as RegexReplacer};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::error::TransformError;
use crate::core::search::{resolve_search_value, FlexibleSearchValue, Replacer, SearchPattern};
use crate::core::text::{ends_with_word_char, starts_with_word_char, title_case, KeyPattern};
use crate::core::transformer::{TransformContext, TransformResult, Transformer};

/// 默认复数标记
pub const DEFAULT_PLURAL_MARKER: &str = "(s)";

async fn resolve(
    value: &FlexibleSearchValue,
    ctx: &TransformContext<'_>,
) -> Result<SearchPattern, TransformError> {
    Ok(resolve_search_value(
        value,
        ctx.language_file_data,
        ctx.language,
        ctx.version,
        ctx.language_files,
    )
    .await?)
}

fn compile(source: &str) -> Result<Regex, TransformError> {
    Regex::new(source).map_err(|error| TransformError::SearchValue(error.into()))
}

/// 忽略原值，返回固定字符串
#[derive(Debug, Clone)]
pub struct OverrideTransformer {
    value: String,
}

impl OverrideTransformer {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl Transformer for OverrideTransformer {
    fn name(&self) -> &str {
        "Override"
    }

    async fn apply(&self, _ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        Ok(TransformResult::value(self.value.clone()))
    }
}

/// 自定义回调
pub type CustomCallback = Arc<dyn Fn(&TransformContext<'_>) -> String + Send + Sync>;

/// 处理内置转换器无法覆盖的情况
#[derive(Clone)]
pub struct CustomTransformer {
    name: String,
    callback: CustomCallback,
}

impl CustomTransformer {
    pub fn new(callback: impl Fn(&TransformContext<'_>) -> String + Send + Sync + 'static) -> Self {
        Self::named("Custom", callback)
    }

    pub fn named(
        name: impl Into<String>,
        callback: impl Fn(&TransformContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }
}

#[async_trait]
impl Transformer for CustomTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        Ok(TransformResult::value((self.callback)(ctx)))
    }
}

/// 替换搜索值
///
/// 字符串模式只替换第一个匹配；正则模式按 `global` 决定替换一个或全部。
#[derive(Debug, Clone)]
pub struct ReplaceTransformer {
    search: FlexibleSearchValue,
    replacer: Replacer,
}

impl ReplaceTransformer {
    pub fn new(search: impl Into<FlexibleSearchValue>, replacer: impl Into<Replacer>) -> Self {
        Self {
            search: search.into(),
            replacer: replacer.into(),
        }
    }
}

fn replace_matches<R: RegexReplacer>(regex: &Regex, global: bool, haystack: &str, replacer: R) -> String {
    if global {
        regex.replace_all(haystack, replacer).into_owned()
    } else {
        regex.replace(haystack, replacer).into_owned()
    }
}

/// 将替换文本转换为 `regex` 的展开模板
///
/// 只识别 `$$`、`$&`、`$n`/`$nn`（对应的捕获组存在时）和 `$<name>`（正则含命名组时），
/// 其余 `$` 一律按字面保留，例如 `%1$s`。
fn replacement_template(text: &str, regex: &Regex) -> String {
    let group_count = regex.captures_len();
    let has_named_groups = regex.capture_names().flatten().next().is_some();

    let mut template = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(position) = rest.find('$') {
        template.push_str(&rest[..position]);
        let tail = &rest[position + 1..];

        let consumed = if let Some(after) = tail.strip_prefix('$') {
            template.push_str("$$");
            tail.len() - after.len()
        } else if tail.starts_with('&') {
            template.push_str("${0}");
            1
        } else if let Some(digits) = group_reference(tail, group_count) {
            template.push_str(&format!("${{{}}}", &tail[..digits]));
            digits
        } else if let Some(name) = tail
            .strip_prefix('<')
            .and_then(|after| after.split_once('>'))
            .map(|(name, _)| name)
            .filter(|_| has_named_groups)
        {
            template.push_str(&format!("${{{}}}", name));
            name.len() + 2
        } else {
            template.push_str("$$");
            0
        };

        rest = &tail[consumed..];
    }
    template.push_str(rest);
    template
}

/// `$` 之后的捕获组编号长度；编号为 0 或超出捕获组数量时不是引用
fn group_reference(tail: &str, group_count: usize) -> Option<usize> {
    let digits = tail.bytes().take(2).take_while(u8::is_ascii_digit).count();
    (1..=digits).rev().find(|&length| {
        tail[..length]
            .parse::<usize>()
            .map_or(false, |group| group > 0 && group < group_count)
    })
}

/// 捕获组按顺序传给回调，遇到未参与匹配的组即停止
fn capture_groups(captures: &Captures<'_>) -> Vec<String> {
    captures
        .iter()
        .skip(1)
        .map_while(|group| group.map(|m| m.as_str().to_string()))
        .collect()
}

#[async_trait]
impl Transformer for ReplaceTransformer {
    fn name(&self) -> &str {
        "Replace"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let Some(old_value) = ctx.old_value else {
            return Ok(TransformResult::none());
        };

        let search = resolve(&self.search, ctx).await?;

        let value = match (&search, &self.replacer) {
            (SearchPattern::Text(text), Replacer::Function(callback)) => {
                match old_value.find(text.as_str()) {
                    Some(start) => {
                        let end = start + text.len();
                        let replacement = callback(&old_value[start..end], &[]);
                        format!("{}{}{}", &old_value[..start], replacement, &old_value[end..])
                    }
                    None => old_value.to_string(),
                }
            }
            (SearchPattern::Text(text), replacer) => {
                let replacement = self.replacement_text(replacer, ctx).await?;
                old_value.replacen(text.as_str(), &replacement, 1)
            }
            (SearchPattern::Regex { regex, global }, Replacer::Function(callback)) => {
                let replace = |captures: &Captures<'_>| {
                    callback(&captures[0], &capture_groups(captures))
                };
                replace_matches(regex, *global, old_value, replace)
            }
            (SearchPattern::Regex { regex, global }, Replacer::Deferred(value)) => {
                // 原版文本中的 `%1$s` 必须原样保留
                let replacement = resolve(value, ctx).await?.as_text().to_string();
                replace_matches(regex, *global, old_value, NoExpand(&replacement))
            }
            (SearchPattern::Regex { regex, global }, replacer) => {
                let replacement = self.replacement_text(replacer, ctx).await?;
                let template = replacement_template(&replacement, regex);
                replace_matches(regex, *global, old_value, template.as_str())
            }
        };

        Ok(TransformResult::value(value))
    }
}

impl ReplaceTransformer {
    async fn replacement_text(
        &self,
        replacer: &Replacer,
        ctx: &TransformContext<'_>,
    ) -> Result<String, TransformError> {
        match replacer {
            Replacer::Text(text) => Ok(text.clone()),
            Replacer::Deferred(value) => Ok(resolve(value, ctx).await?.as_text().to_string()),
            Replacer::Function(_) => Err(TransformError::Custom {
                transformer: self.name().to_string(),
                key: ctx.key.to_string(),
                message: "replacer callback cannot be used as text".to_string(),
            }),
        }
    }
}

/// 结合上下文的替换：只替换 `target`，`before` 与 `after` 保持不变
#[derive(Debug, Clone)]
pub struct ContextualReplaceTransformer {
    name: String,
    regex: Regex,
    replacement: String,
}

impl ContextualReplaceTransformer {
    pub fn new(
        before: Option<&str>,
        target: &str,
        after: Option<&str>,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Self::named("ContextualReplace", before, target, after, replacement)
    }

    fn named(
        name: &str,
        before: Option<&str>,
        target: &str,
        after: Option<&str>,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let source = format!(
            "(?P<before>{})(?P<target>{})(?P<after>{})",
            before.unwrap_or_default(),
            target,
            after.unwrap_or_default()
        );
        Ok(Self {
            name: name.to_string(),
            regex: Regex::new(&source)?,
            replacement: replacement.into(),
        })
    }
}

#[async_trait]
impl Transformer for ContextualReplaceTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let old_value = ctx.require_value(self.name())?;

        let value = self.regex.replace(old_value, |captures: &Captures<'_>| {
            format!("{}{}{}", &captures["before"], self.replacement, &captures["after"])
        });

        Ok(TransformResult::value(value.into_owned()))
    }
}

/// 删除一个单词及其后的一个空格，可限定前后必须出现的内容
#[derive(Debug, Clone)]
pub struct RemoveWordTransformer {
    inner: ContextualReplaceTransformer,
}

impl RemoveWordTransformer {
    pub fn new(word: &str) -> Result<Self, regex::Error> {
        Self::with_context(word, None, None)
    }

    pub fn with_context(
        word: &str,
        match_before: Option<&str>,
        match_after: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let before = match_before.map(|before| format!("(?:{}) ", before));
        let target = format!("(?:{}) ", word);
        Ok(Self {
            inner: ContextualReplaceTransformer::named(
                "RemoveWord",
                before.as_deref(),
                &target,
                match_after,
                "",
            )?,
        })
    }
}

#[async_trait]
impl Transformer for RemoveWordTransformer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        self.inner.apply(ctx).await
    }
}

/// 将整个字符串转换为标题大小写，适用于按钮文本等
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleCaseTransformer;

impl TitleCaseTransformer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transformer for TitleCaseTransformer {
    fn name(&self) -> &str {
        "TitleCase"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        Ok(ctx
            .old_value
            .map(title_case)
            .filter(|value| !value.is_empty())
            .into())
    }
}

/// 将匹配搜索值的片段转换为标题大小写（不区分大小写，全部匹配）
#[derive(Debug, Clone)]
pub struct CapitaliseSegmentTransformer {
    search: FlexibleSearchValue,
}

impl CapitaliseSegmentTransformer {
    pub fn new(search: impl Into<FlexibleSearchValue>) -> Self {
        Self {
            search: search.into(),
        }
    }
}

#[async_trait]
impl Transformer for CapitaliseSegmentTransformer {
    fn name(&self) -> &str {
        "CapitaliseSegment"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let Some(old_value) = ctx.old_value else {
            return Ok(TransformResult::none());
        };

        let pattern = resolve(&self.search, ctx).await?;
        let regex = compile(&format!("(?i){}", pattern.to_regex_source()))?;
        let value = regex.replace_all(old_value, |captures: &Captures<'_>| title_case(&captures[0]));

        Ok(TransformResult::value(value.into_owned()))
    }
}

/// 将两个边界之间（含边界）的部分转换为标题大小写
///
/// 边界为 `None` 时分别表示字符串开头与结尾。终点从起点处开始查找。
#[derive(Debug, Clone)]
pub struct CapitaliseSectionTransformer {
    start: Option<SearchPattern>,
    end: Option<SearchPattern>,
}

impl CapitaliseSectionTransformer {
    pub fn new(start: Option<SearchPattern>, end: Option<SearchPattern>) -> Self {
        Self { start, end }
    }

    fn describe(boundary: &Option<SearchPattern>) -> String {
        boundary
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "null".to_string())
    }
}

#[async_trait]
impl Transformer for CapitaliseSectionTransformer {
    fn name(&self) -> &str {
        "CapitaliseSection"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let Some(old_value) = ctx.old_value else {
            return Ok(TransformResult::none());
        };

        let start_index = match &self.start {
            None => Some(0),
            Some(pattern) => pattern.find_from(old_value, 0).map(|(start, _)| start),
        };
        let Some(start_index) = start_index else {
            ctx.logger.warn(format!(
                "Start search string didn't match anything in the string. Searching for {} in \"{}\" while processing translation key {}.",
                Self::describe(&self.start),
                old_value,
                ctx.key
            ));
            return Ok(TransformResult::value(old_value));
        };

        let end_index = match &self.end {
            None => Some(old_value.len()),
            Some(pattern) => pattern.find_from(old_value, start_index).map(|(_, end)| end),
        };
        let Some(end_index) = end_index else {
            ctx.logger.warn(format!(
                "End search string didn't match anything in the string. Searching for {} in \"{}\" while processing translation key {}.",
                Self::describe(&self.end),
                old_value,
                ctx.key
            ));
            return Ok(TransformResult::value(old_value));
        };

        let value = format!(
            "{}{}{}",
            &old_value[..start_index],
            title_case(&old_value[start_index..end_index]),
            &old_value[end_index..]
        );
        Ok(TransformResult::value(value))
    }
}

/// 按原版翻译文本自动修正游戏内名称的大小写
///
/// 收集键匹配任一通配符的原版文本，在当前字符串中按整词、不区分大小写查找
/// 该文本或其加 `s` 的复数形式，并替换为原版的写法。
#[derive(Debug, Clone)]
pub struct CapitaliseFromTranslationStringsTransformer {
    patterns: Vec<KeyPattern>,
}

impl CapitaliseFromTranslationStringsTransformer {
    pub fn new<P: Into<KeyPattern>>(patterns: impl IntoIterator<Item = P>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[KeyPattern] {
        &self.patterns
    }

    fn matcher(value: &str) -> Result<Regex, TransformError> {
        let boundary_start = if starts_with_word_char(value) { r"\b" } else { "" };
        let boundary_end = if ends_with_word_char(value) { r"\b" } else { "" };
        compile(&format!(
            "(?i){}{}(s?){}",
            boundary_start,
            regex::escape(value),
            boundary_end
        ))
    }
}

#[async_trait]
impl Transformer for CapitaliseFromTranslationStringsTransformer {
    fn name(&self) -> &str {
        "CapitaliseFromTranslationStrings"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let mut current = ctx.require_value(self.name())?.to_string();

        let names: BTreeSet<&str> = ctx
            .language_file_data
            .iter()
            .filter(|(key, _)| self.patterns.iter().any(|pattern| pattern.matches(key)))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .collect();

        for name in names {
            let matcher = Self::matcher(name)?;
            if !matcher.is_match(&current) {
                continue;
            }
            current = matcher
                .replace_all(&current, |captures: &Captures<'_>| {
                    format!("{}{}", name, &captures[1])
                })
                .into_owned();
        }

        Ok(TransformResult::value(current))
    }
}

/// 为匹配的单词追加复数标记，已带标记的单词保持不变
#[derive(Debug, Clone)]
pub struct PluralGuardTransformer {
    search: FlexibleSearchValue,
    marker: String,
}

impl PluralGuardTransformer {
    pub fn new(search: impl Into<FlexibleSearchValue>) -> Self {
        Self::with_marker(search, DEFAULT_PLURAL_MARKER)
    }

    pub fn with_marker(search: impl Into<FlexibleSearchValue>, marker: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl Transformer for PluralGuardTransformer {
    fn name(&self) -> &str {
        "PluralGuard"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        let Some(old_value) = ctx.old_value else {
            return Ok(TransformResult::none());
        };

        let pattern = resolve(&self.search, ctx).await?;
        let regex = compile(&format!(
            r"\b(?P<word>{})(?P<plural>s)?\b",
            pattern.to_regex_source()
        ))?;

        let mut value = String::with_capacity(old_value.len() + self.marker.len());
        let mut last = 0;
        for captures in regex.captures_iter(old_value) {
            let (Some(whole), Some(word)) = (captures.get(0), captures.name("word")) else {
                continue;
            };
            value.push_str(&old_value[last..whole.start()]);
            if old_value[whole.end()..].starts_with(self.marker.as_str()) {
                value.push_str(whole.as_str());
            } else {
                value.push_str(word.as_str());
                value.push_str(&self.marker);
            }
            last = whole.end();
        }
        value.push_str(&old_value[last..]);

        Ok(TransformResult::value(value))
    }
}
