// ============================================================================
// CapsFix - 修复规则分组
// ============================================================================
//
// 文件: src/core/groups.rs
// 职责: 一次构造共享工单与版本约束的多条修复规则
// 边界:
//   - ✅ 键前缀处理（自动补全末尾的 `.`）
//   - ✅ 覆盖文本 / 转换器 / 标题大小写 / 自动大写分组
//   - ❌ 不应包含具体的修复规则数据
//
// ============================================================================

use std::sync::Arc;

use crate::core::error::FixError;
use crate::core::fix::Fix;
use crate::core::search::FlexibleSearchValue;
use crate::core::transformer::SharedTransformer;
use crate::core::transformers::{
    CapitaliseFromTranslationStringsTransformer, CapitaliseSegmentTransformer, OverrideTransformer,
    TitleCaseTransformer,
};
use crate::models::version::VersionSpecifier;

/// 自动大写默认参照的原版键
pub const DEFAULT_VANILLA_STRINGS: &[&str] = &["block.**", "item.**", "entity.**"];

/// 分组共享选项
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    key_prefix: String,
    versions: Option<VersionSpecifier>,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('.') {
            prefix.push('.');
        }
        self.key_prefix = prefix;
        self
    }

    pub fn versions(mut self, versions: impl Into<VersionSpecifier>) -> Self {
        self.versions = Some(versions.into());
        self
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn fix(&self, bug: &str, key: &str, transformers: Vec<SharedTransformer>) -> Result<Fix, FixError> {
        Fix::chain(self.key(key), transformers)
            .maybe_versions(self.versions.clone())
            .bug(bug)
            .build()
    }
}

/// 分组中单个键的目标
#[derive(Clone)]
pub enum GroupValue {
    Override(String),
    Transformer(SharedTransformer),
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        GroupValue::Override(value.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(value: String) -> Self {
        GroupValue::Override(value)
    }
}

impl From<SharedTransformer> for GroupValue {
    fn from(transformer: SharedTransformer) -> Self {
        GroupValue::Transformer(transformer)
    }
}

/// 每个键各自的覆盖文本或转换器
pub fn fix_group<K, V>(
    bug: &str,
    strings: impl IntoIterator<Item = (K, V)>,
    options: &GroupOptions,
) -> Result<Vec<Fix>, FixError>
where
    K: AsRef<str>,
    V: Into<GroupValue>,
{
    strings
        .into_iter()
        .map(|(key, value)| {
            let transformer: SharedTransformer = match value.into() {
                GroupValue::Override(text) => Arc::new(OverrideTransformer::new(text)),
                GroupValue::Transformer(transformer) => transformer,
            };
            options.fix(bug, key.as_ref(), vec![transformer])
        })
        .collect()
}

/// 多个键共享同一个转换器
pub fn multi_fix_group<K: AsRef<str>>(
    bug: &str,
    transformer: SharedTransformer,
    keys: impl IntoIterator<Item = K>,
    options: &GroupOptions,
) -> Result<Vec<Fix>, FixError> {
    keys.into_iter()
        .map(|key| options.fix(bug, key.as_ref(), vec![Arc::clone(&transformer)]))
        .collect()
}

pub fn title_case_group<K: AsRef<str>>(
    bug: &str,
    keys: impl IntoIterator<Item = K>,
    options: &GroupOptions,
) -> Result<Vec<Fix>, FixError> {
    multi_fix_group(bug, Arc::new(TitleCaseTransformer::new()), keys, options)
}

/// 自动大写分组选项
#[derive(Debug, Clone)]
pub struct AutoCapitaliseOptions {
    pub group: GroupOptions,
    /// 参照的原版键模式
    pub vanilla_strings: Vec<String>,
    /// 始终大写的片段，在自动大写之后执行
    pub always_capitalise: Vec<FlexibleSearchValue>,
}

impl Default for AutoCapitaliseOptions {
    fn default() -> Self {
        Self {
            group: GroupOptions::default(),
            vanilla_strings: DEFAULT_VANILLA_STRINGS.iter().map(|s| s.to_string()).collect(),
            always_capitalise: Vec::new(),
        }
    }
}

/// 依据原版物品 / 方块 / 实体名称自动大写
pub fn auto_capitalise_group<K: AsRef<str>>(
    bug: &str,
    keys: impl IntoIterator<Item = K>,
    options: &AutoCapitaliseOptions,
) -> Result<Vec<Fix>, FixError> {
    let mut transformers: Vec<SharedTransformer> = vec![Arc::new(
        CapitaliseFromTranslationStringsTransformer::new(options.vanilla_strings.iter().map(String::as_str)),
    )];
    for search in &options.always_capitalise {
        transformers.push(Arc::new(CapitaliseSegmentTransformer::new(search.clone())));
    }

    keys.into_iter()
        .map(|key| options.group.fix(bug, key.as_ref(), transformers.clone()))
        .collect()
}
