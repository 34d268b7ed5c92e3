// ============================================================================
// CapsFix - 错误类型定义
// ============================================================================
//
// 文件: src/core/error.rs
// 职责: 核心库各关注点的错误类型
// 边界:
//   - ✅ 数据源错误 (网络 / 解析 / IO)
//   - ✅ 版本解析错误
//   - ✅ 转换器与搜索值错误
//   - ✅ 修复规则构造与漏洞校验错误
//   - ✅ 生成阶段错误
//   - ❌ 不应包含错误展示逻辑
//   - ❌ 不应包含 CLI 层的 anyhow 上下文
//
// ============================================================================

use thiserror::Error;

use crate::models::bug::Resolution;
use crate::models::version::VersionId;

/// 外部数据源（版本清单 / 语言文件 / 漏洞追踪）错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected response from {url}: status {status}")]
    UnexpectedResponse { url: String, status: u16 },
}

/// 版本解析错误
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("unknown version: {0}")]
    UnknownVersion(String),

    #[error("invalid version range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },

    #[error("failed to load version catalog: {0}")]
    Source(#[from] SourceError),
}

/// 搜索值解析错误
#[derive(Debug, Error)]
pub enum SearchValueError {
    #[error("translation key {key} is missing from {language} {version}")]
    MissingTranslationKey {
        key: String,
        language: String,
        version: VersionId,
    },

    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to load language file: {0}")]
    Source(#[from] SourceError),
}

/// 转换器错误
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(
        "transformer {transformer} returned an empty string for {key} ({version} {language})"
    )]
    EmptyTransformResult {
        transformer: String,
        key: String,
        version: VersionId,
        language: String,
    },

    #[error("no value returned from transformers for {key}; were any transformers provided?")]
    NoTransformerOutput { key: String },

    #[error("transformer {transformer} received no value for {key}")]
    MissingValue { transformer: String, key: String },

    #[error(transparent)]
    SearchValue(#[from] SearchValueError),

    #[error("transformer {transformer} failed for {key}: {message}")]
    Custom {
        transformer: String,
        key: String,
        message: String,
    },
}

/// 修复规则构造错误
#[derive(Debug, Error)]
pub enum FixError {
    #[error("fix key must not be empty")]
    EmptyKey,

    #[error("malformed bug key {bug} on fix {key}")]
    MalformedBugKey { key: String, bug: String },
}

/// 漏洞关联校验错误
#[derive(Debug, Error)]
pub enum BugValidationError {
    #[error("malformed bug key {0}")]
    MalformedBugKey(String),

    #[error("bug {bug} linked to {key} does not exist")]
    BugNotFound { key: String, bug: String },

    #[error("bug {bug} linked to {key} is resolved as {resolution}; the fix should not exist")]
    InappropriateResolution {
        key: String,
        bug: String,
        resolution: Resolution,
    },

    #[error("bug tracker lookup failed: {0}")]
    Tracker(#[from] SourceError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// 生成阶段错误
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("translation string {key} is missing from {language} {version} and every fallback")]
    MissingTranslationString {
        key: String,
        version: VersionId,
        language: String,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("failed to load language file: {0}")]
    Source(#[from] SourceError),

    #[error("generation task {task} failed: {message}")]
    Task { task: String, message: String },
}
