// ============================================================================
// CapsFix - 转换器接口
// ============================================================================
//
// 文件: src/core/transformer.rs
// 职责: 转换器能力接口、调用上下文与顺序组合
// 边界:
//   - ✅ 转换器 trait 定义（显式名称）
//   - ✅ 转换上下文与结果
//   - ✅ 多个转换器的顺序组合 (Multi)
//   - ✅ 空结果与无输出检测
//   - ❌ 不应包含具体的文本转换规则
//   - ❌ 不应包含版本过滤逻辑
//
// ============================================================================

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::TransformError;
use crate::core::logger::TransformerLogger;
use crate::models::language::LanguageFileData;
use crate::providers::LanguageFileSource;

/// 单次转换调用的上下文
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    /// 翻译键
    pub key: &'a str,
    /// 上一步的值；链首为原版文本，原版不存在时为 `None`
    pub old_value: Option<&'a str>,
    pub language: &'a str,
    pub version: &'a str,
    /// 目标 (版本, 语言) 的原版语言文件
    pub language_file_data: &'a LanguageFileData,
    pub language_files: &'a dyn LanguageFileSource,
    pub logger: &'a TransformerLogger,
}

impl<'a> TransformContext<'a> {
    /// 替换上一步的值
    pub fn with_old_value<'b>(&self, old_value: Option<&'b str>) -> TransformContext<'b>
    where
        'a: 'b,
    {
        TransformContext {
            key: self.key,
            old_value,
            language: self.language,
            version: self.version,
            language_file_data: self.language_file_data,
            language_files: self.language_files,
            logger: self.logger,
        }
    }

    /// 需要输入值的转换器在缺少值时报错
    pub fn require_value(&self, transformer: &str) -> Result<&'a str, TransformError> {
        self.old_value.ok_or_else(|| TransformError::MissingValue {
            transformer: transformer.to_string(),
            key: self.key.to_string(),
        })
    }

    pub fn empty_result(&self, transformer: &str) -> TransformError {
        TransformError::EmptyTransformResult {
            transformer: transformer.to_string(),
            key: self.key.to_string(),
            version: self.version.to_string(),
            language: self.language.to_string(),
        }
    }
}

/// 转换结果，`None` 表示透传缺失值
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformResult {
    pub value: Option<String>,
}

impl TransformResult {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn none() -> Self {
        Self { value: None }
    }
}

impl From<Option<String>> for TransformResult {
    fn from(value: Option<String>) -> Self {
        Self { value }
    }
}

/// 文本转换器
///
/// 构造后不可变。返回空字符串一律视为错误，返回 `None` 只在链首没有原版值时有效。
#[async_trait]
pub trait Transformer: Send + Sync {
    /// 用于日志与错误信息的名称
    fn name(&self) -> &str;

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError>;
}

pub type SharedTransformer = Arc<dyn Transformer>;

/// 顺序组合多个转换器，每一步的输出作为下一步的输入
#[derive(Clone)]
pub struct MultiTransformer {
    transformers: Vec<SharedTransformer>,
}

impl MultiTransformer {
    pub fn new(transformers: Vec<SharedTransformer>) -> Self {
        Self { transformers }
    }

    pub fn transformers(&self) -> &[SharedTransformer] {
        &self.transformers
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl std::fmt::Debug for MultiTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transformers.iter().map(|t| t.name()))
            .finish()
    }
}

#[async_trait]
impl Transformer for MultiTransformer {
    fn name(&self) -> &str {
        "Multi"
    }

    async fn apply(&self, ctx: &TransformContext<'_>) -> Result<TransformResult, TransformError> {
        if self.transformers.is_empty() {
            return Err(TransformError::NoTransformerOutput {
                key: ctx.key.to_string(),
            });
        }

        let mut current: Option<String> = ctx.old_value.map(str::to_string);

        for transformer in &self.transformers {
            let step = ctx.with_old_value(current.as_deref());
            let result = transformer.apply(&step).await?;

            if result.value.as_deref() == Some("") {
                return Err(ctx.empty_result(transformer.name()));
            }
            current = result.value;
        }

        match current {
            Some(value) => Ok(TransformResult::value(value)),
            None => Err(TransformError::NoTransformerOutput {
                key: ctx.key.to_string(),
            }),
        }
    }
}
