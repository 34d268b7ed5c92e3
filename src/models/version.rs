// ============================================================================
// CapsFix - 版本数据模型
// ============================================================================
//
// 文件: src/models/version.rs
// 职责: Minecraft 版本目录与版本说明符的数据结构定义
// 边界:
//   - ✅ 版本清单 (version manifest) 数据结构
//   - ✅ 版本说明符 (单个版本 / 区间 / latest / 数字版本) 定义
//   - ✅ 说明符的序列化/反序列化 (TOML / JSON)
//   - ✅ 说明符的构造辅助方法
//   - ❌ 不应包含版本解析算法
//   - ❌ 不应包含网络请求
//   - ❌ 不应包含缓存逻辑
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 单个 Minecraft 版本 ID，例如 `"1.19.1-pre1"`
pub type VersionId = String;

/// 版本清单中的单个版本元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// 版本 ID
    pub id: VersionId,
    /// 版本类型 (release / snapshot / old_beta / old_alpha)
    #[serde(rename = "type")]
    pub kind: String,
    /// 发布时间
    #[serde(default, rename = "releaseTime", skip_serializing_if = "Option::is_none")]
    pub release_time: Option<String>,
}

impl VersionMetadata {
    /// 是否为正式版
    pub fn is_release(&self) -> bool {
        self.kind == "release"
    }
}

/// 各分支的最新版本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestVersions {
    pub release: VersionId,
    pub snapshot: VersionId,
}

/// 启动器版本清单（原始顺序为从新到旧）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionMetadata>,
}

/// 版本分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBranch {
    Release,
    #[default]
    Snapshot,
}

impl fmt::Display for VersionBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBranch::Release => write!(f, "release"),
            VersionBranch::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// 版本类型过滤器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionType {
    /// 正式版
    Release,
    /// 所有非正式版
    Development,
    /// 周快照 (例如 `23w07a`)
    Snapshot,
    /// 预发布版 (例如 `1.19.4-pre1`)
    PreRelease,
    /// 候选发布版 (例如 `1.19.4-rc1`)
    ReleaseCandidate,
}

/// 数字版本的后缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attachment {
    Pre(u32),
    Rc(u32),
}

/// 以数字形式描述的版本，例如 `1.19.4-rc2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericVersion {
    pub main: u32,
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl NumericVersion {
    pub fn new(main: u32, major: u32, minor: u32) -> Self {
        Self {
            main,
            major,
            minor,
            attachment: None,
        }
    }

    pub fn pre(mut self, number: u32) -> Self {
        self.attachment = Some(Attachment::Pre(number));
        self
    }

    pub fn rc(mut self, number: u32) -> Self {
        self.attachment = Some(Attachment::Rc(number));
        self
    }
}

impl fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.main, self.major)?;
        // 次版本号为 0 时省略，Mojang 的版本 ID 写作 1.20 而不是 1.20.0
        if self.minor != 0 {
            write!(f, ".{}", self.minor)?;
        }
        match self.attachment {
            Some(Attachment::Pre(n)) => write!(f, "-pre{}", n),
            Some(Attachment::Rc(n)) => write!(f, "-rc{}", n),
            None => Ok(()),
        }
    }
}

/// 指向某个分支最新版本的说明符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatestTarget {
    pub latest: VersionBranch,
}

/// 解析结果为单个版本的说明符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SingleVersionSpecifier {
    /// 字面版本 ID
    Id(VersionId),
    /// 某分支的最新版本
    Latest(LatestTarget),
    /// 数字版本
    Numeric(NumericVersion),
}

impl SingleVersionSpecifier {
    /// 最新快照
    pub fn latest() -> Self {
        Self::latest_on(VersionBranch::Snapshot)
    }

    pub fn latest_on(branch: VersionBranch) -> Self {
        SingleVersionSpecifier::Latest(LatestTarget { latest: branch })
    }
}

impl From<&str> for SingleVersionSpecifier {
    fn from(id: &str) -> Self {
        SingleVersionSpecifier::Id(id.to_string())
    }
}

impl From<String> for SingleVersionSpecifier {
    fn from(id: String) -> Self {
        SingleVersionSpecifier::Id(id)
    }
}

impl From<NumericVersion> for SingleVersionSpecifier {
    fn from(version: NumericVersion) -> Self {
        SingleVersionSpecifier::Numeric(version)
    }
}

impl fmt::Display for SingleVersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingleVersionSpecifier::Id(id) => write!(f, "{}", id),
            SingleVersionSpecifier::Latest(target) => write!(f, "latest {}", target.latest),
            SingleVersionSpecifier::Numeric(version) => write!(f, "{}", version),
        }
    }
}

/// 区间起点默认包含
pub const DEFAULT_EXCLUSIVE_START: bool = false;
/// 区间终点默认不包含
pub const DEFAULT_EXCLUSIVE_END: bool = true;

fn default_exclusive_start() -> bool {
    DEFAULT_EXCLUSIVE_START
}

fn default_exclusive_end() -> bool {
    DEFAULT_EXCLUSIVE_END
}

fn is_default_exclusive_start(value: &bool) -> bool {
    *value == DEFAULT_EXCLUSIVE_START
}

fn is_default_exclusive_end(value: &bool) -> bool {
    *value == DEFAULT_EXCLUSIVE_END
}

/// 版本区间
///
/// `only` 存在时忽略其余所有字段。`exclude` 先于 `include` 生效，
/// 因此同时出现在两者中的版本一定会被保留。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only: Option<SingleVersionSpecifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<SingleVersionSpecifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<SingleVersionSpecifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<VersionSpecifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<VersionSpecifier>,
    #[serde(
        default = "default_exclusive_start",
        skip_serializing_if = "is_default_exclusive_start"
    )]
    pub exclusive_start: bool,
    #[serde(
        default = "default_exclusive_end",
        skip_serializing_if = "is_default_exclusive_end"
    )]
    pub exclusive_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<VersionType>,
}

impl Default for VersionRange {
    fn default() -> Self {
        Self {
            only: None,
            start: None,
            end: None,
            include: Vec::new(),
            exclude: Vec::new(),
            exclusive_start: DEFAULT_EXCLUSIVE_START,
            exclusive_end: DEFAULT_EXCLUSIVE_END,
            filter: None,
        }
    }
}

impl VersionRange {
    /// 空区间
    pub fn new() -> Self {
        Self::default()
    }

    /// 简单区间 `[start, end)`，任一端为 `None` 表示不设限
    pub fn between(
        start: Option<SingleVersionSpecifier>,
        end: Option<SingleVersionSpecifier>,
    ) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// 仅包含单个版本
    pub fn only(version: impl Into<SingleVersionSpecifier>) -> Self {
        Self {
            only: Some(version.into()),
            ..Self::default()
        }
    }

    pub fn from_version(mut self, version: impl Into<SingleVersionSpecifier>) -> Self {
        self.start = Some(version.into());
        self
    }

    pub fn until(mut self, version: impl Into<SingleVersionSpecifier>) -> Self {
        self.end = Some(version.into());
        self
    }

    pub fn with_include(mut self, specifier: impl Into<VersionSpecifier>) -> Self {
        self.include.push(specifier.into());
        self
    }

    pub fn with_exclude(mut self, specifier: impl Into<VersionSpecifier>) -> Self {
        self.exclude.push(specifier.into());
        self
    }

    pub fn exclusive_start(mut self, exclusive: bool) -> Self {
        self.exclusive_start = exclusive;
        self
    }

    pub fn exclusive_end(mut self, exclusive: bool) -> Self {
        self.exclusive_end = exclusive;
        self
    }

    pub fn with_filter(mut self, filter: VersionType) -> Self {
        self.filter = Some(filter);
        self
    }

    /// 没有起点、终点和 include 的区间对所有版本都生效
    pub fn is_unconstrained(&self) -> bool {
        self.only.is_none() && self.start.is_none() && self.end.is_none() && self.include.is_empty()
    }

    pub fn is_constrained(&self) -> bool {
        !self.is_unconstrained()
    }

    /// 没有边界和 include，但用 exclude 或 filter 从完整目录中收窄
    pub fn narrows_catalog(&self) -> bool {
        self.is_unconstrained() && (!self.exclude.is_empty() || self.filter.is_some())
    }
}

/// 版本说明符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVersionSpecifier", into = "RawVersionSpecifier")]
pub enum VersionSpecifier {
    Single(SingleVersionSpecifier),
    Range(VersionRange),
}

impl VersionSpecifier {
    /// 简单区间 `[start, end)`
    pub fn between(start: Option<&str>, end: Option<&str>) -> Self {
        VersionSpecifier::Range(VersionRange::between(
            start.map(SingleVersionSpecifier::from),
            end.map(SingleVersionSpecifier::from),
        ))
    }

    pub fn latest(branch: VersionBranch) -> Self {
        VersionSpecifier::Single(SingleVersionSpecifier::latest_on(branch))
    }

    pub fn is_unconstrained(&self) -> bool {
        match self {
            VersionSpecifier::Single(_) => false,
            VersionSpecifier::Range(range) => range.is_unconstrained(),
        }
    }

    pub fn is_constrained(&self) -> bool {
        !self.is_unconstrained()
    }

    /// 无需解析即可确定覆盖所有版本
    pub fn matches_every_version(&self) -> bool {
        match self {
            VersionSpecifier::Single(_) => false,
            VersionSpecifier::Range(range) => range.is_unconstrained() && !range.narrows_catalog(),
        }
    }
}

impl Default for VersionSpecifier {
    fn default() -> Self {
        VersionSpecifier::Range(VersionRange::default())
    }
}

impl From<&str> for VersionSpecifier {
    fn from(id: &str) -> Self {
        VersionSpecifier::Single(id.into())
    }
}

impl From<SingleVersionSpecifier> for VersionSpecifier {
    fn from(specifier: SingleVersionSpecifier) -> Self {
        VersionSpecifier::Single(specifier)
    }
}

impl From<NumericVersion> for VersionSpecifier {
    fn from(version: NumericVersion) -> Self {
        VersionSpecifier::Single(version.into())
    }
}

impl From<VersionRange> for VersionSpecifier {
    fn from(range: VersionRange) -> Self {
        VersionSpecifier::Range(range)
    }
}

/// 配置文件中版本说明符的书写形式
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawVersionSpecifier {
    Single(SingleVersionSpecifier),
    Pair(Option<SingleVersionSpecifier>, Option<SingleVersionSpecifier>),
    Range(VersionRange),
}

impl From<RawVersionSpecifier> for VersionSpecifier {
    fn from(raw: RawVersionSpecifier) -> Self {
        match raw {
            RawVersionSpecifier::Single(single) => VersionSpecifier::Single(single),
            RawVersionSpecifier::Pair(start, end) => {
                VersionSpecifier::Range(VersionRange::between(start, end))
            }
            RawVersionSpecifier::Range(range) => VersionSpecifier::Range(range),
        }
    }
}

impl From<VersionSpecifier> for RawVersionSpecifier {
    fn from(specifier: VersionSpecifier) -> Self {
        match specifier {
            VersionSpecifier::Single(single) => RawVersionSpecifier::Single(single),
            VersionSpecifier::Range(range) => RawVersionSpecifier::Range(range),
        }
    }
}
