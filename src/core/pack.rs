// ============================================================================
// CapsFix - 资源包输出
// ============================================================================
//
// 文件: src/core/pack.rs
// 职责: 将生成结果写为资源包目录
// 边界:
//   - ✅ pack.mcmeta 与 pack_format 查找
//   - ✅ 语言文件 JSON（4 空格缩进）
//   - ✅ capitalisation_fixes.json 与 index.json
//   - ✅ 输出目录准备与清理
//   - ❌ 不应包含 zip 打包
//   - ❌ 不应包含翻译生成逻辑
//
// ============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::versions::VersionCatalog;
use crate::models::language::{LanguageFileBundle, LanguageFileData, LanguageId};
use crate::models::version::VersionId;

/// 正式版本对应的 pack_format，按时间顺序排列
///
/// 快照沿用它之前最近一个正式版本的格式。
pub const PACK_FORMATS: &[(&str, u32)] = &[
    ("1.6.1", 1),
    ("1.9", 2),
    ("1.11", 3),
    ("1.13", 4),
    ("1.15", 5),
    ("1.16.2", 6),
    ("1.17", 7),
    ("1.18", 8),
    ("1.19", 9),
    ("1.19.3", 12),
    ("1.19.4", 13),
    ("1.20", 15),
    ("1.20.2", 18),
    ("1.20.3", 22),
    ("1.20.5", 32),
    ("1.21", 34),
    ("1.21.2", 42),
    ("1.21.4", 46),
    ("1.21.5", 55),
    ("1.21.6", 63),
];

const PACK_NAME_PREFIX: &str = "Capitalisation-Fixes";
const INFO_FILE_NAME: &str = "capitalisation_fixes.json";
const INDEX_FILE_NAME: &str = "index.json";

/// 查找版本的 pack_format；版本不在目录中时使用最新的格式
pub fn pack_format(version: &str, catalog: &VersionCatalog) -> u32 {
    let latest = PACK_FORMATS.last().map_or(1, |(_, format)| *format);

    let Some(target) = catalog.find_version_index(version) else {
        tracing::warn!(version, "version is not in the catalog, using the newest pack format");
        return latest;
    };

    PACK_FORMATS
        .iter()
        .filter_map(|(release, format)| {
            catalog
                .find_version_index(release)
                .filter(|&index| index <= target)
                .map(|index| (index, *format))
        })
        .max_by_key(|(index, _)| *index)
        .map_or(latest, |(_, format)| format)
}

/// 资源包输出选项
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub output_dir: PathBuf,
    pub clear_directory: bool,
    /// 资源包发布版本；为 `None` 时构建开发版本，目录只以游戏版本命名
    pub pack_version: Option<String>,
    pub description: String,
}

impl PackOptions {
    /// 资源包目录名称
    pub fn pack_name(&self, version: &str) -> String {
        match &self.pack_version {
            Some(pack_version) => format!("{}-{}-{}", PACK_NAME_PREFIX, pack_version, version),
            None => version.to_string(),
        }
    }
}

/// 单个资源包的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackMetadata {
    pub minecraft_version: VersionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_brand: Option<String>,
    pub index: usize,
    pub total_files: usize,
}

/// 已写出的资源包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedPack {
    pub name: String,
    pub path: PathBuf,
    pub metadata: PackMetadata,
}

#[derive(Serialize)]
struct PackMcmeta<'a> {
    pack: PackSection<'a>,
}

#[derive(Serialize)]
struct PackSection<'a> {
    description: &'a str,
    pack_format: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoFile<'a> {
    #[serde(flatten)]
    metadata: &'a PackMetadata,
    license: &'static str,
    license_description: &'static str,
}

/// 将生成结果写到输出目录，每个游戏版本一个资源包
///
/// 资源包按版本目录中的时间顺序编号。
pub fn write_packs(
    bundle: &LanguageFileBundle,
    catalog: &VersionCatalog,
    options: &PackOptions,
) -> Result<Vec<EmittedPack>> {
    prepare_output_dir(&options.output_dir, options.clear_directory)?;

    let mut versions: Vec<&VersionId> = bundle.keys().collect();
    versions.sort_by_key(|version| (catalog.find_version_index(version).unwrap_or(usize::MAX), (*version).clone()));

    let total_files = versions.len();
    let mut emitted = Vec::with_capacity(total_files);

    for (index, version) in versions.into_iter().enumerate() {
        let name = options.pack_name(version);
        let path = options.output_dir.join(&name);
        let metadata = PackMetadata {
            minecraft_version: version.clone(),
            version_brand: options.pack_version.clone(),
            index,
            total_files,
        };

        let languages = bundle.get(version).cloned().unwrap_or_default();
        write_pack(&path, &languages, pack_format(version, catalog), &metadata, options)
            .with_context(|| format!("Failed to write resource pack {}", path.display()))?;

        tracing::debug!(version = %version, path = %path.display(), "resource pack written");
        emitted.push(EmittedPack {
            name,
            path,
            metadata,
        });
    }

    write_index(&options.output_dir, &emitted)?;
    Ok(emitted)
}

fn write_pack(
    path: &Path,
    languages: &std::collections::BTreeMap<LanguageId, LanguageFileData>,
    pack_format: u32,
    metadata: &PackMetadata,
    options: &PackOptions,
) -> Result<()> {
    let lang_dir = path.join("assets").join("minecraft").join("lang");
    fs::create_dir_all(&lang_dir)
        .with_context(|| format!("Failed to create directory {}", lang_dir.display()))?;

    let mcmeta = PackMcmeta {
        pack: PackSection {
            description: &options.description,
            pack_format,
        },
    };
    write_json(&path.join("pack.mcmeta"), &mcmeta)?;

    for (language, data) in languages {
        write_json(&lang_dir.join(format!("{}.json", language)), data)?;
    }

    let info = InfoFile {
        metadata,
        license: "CC0",
        license_description: "Public-domain equivalent. No rights reserved.",
    };
    write_json(&path.join(INFO_FILE_NAME), &info)
}

/// index.json：`[[名称, 元数据], ...]`
fn write_index(output_dir: &Path, packs: &[EmittedPack]) -> Result<()> {
    let entries: Vec<(&str, &PackMetadata)> = packs
        .iter()
        .map(|pack| (pack.name.as_str(), &pack.metadata))
        .collect();
    let content = serde_json::to_string(&entries).context("Failed to serialize pack index")?;
    let path = output_dir.join(INDEX_FILE_NAME);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// 以 4 空格缩进写出 JSON
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, buffer).with_context(|| format!("Failed to write {}", path.display()))
}

/// 创建输出目录；需要时清空其中的内容但保留目录本身
fn prepare_output_dir(output_dir: &Path, clear: bool) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    if !clear {
        return Ok(());
    }

    for entry in fs::read_dir(output_dir)
        .with_context(|| format!("Failed to read output directory {}", output_dir.display()))?
    {
        let path = entry?.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
