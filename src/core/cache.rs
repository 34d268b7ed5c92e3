// ============================================================================
// CapsFix - 缓存能力
// ============================================================================
//
// 文件: src/core/cache.rs
// 职责: 版本清单与语言文件的读穿透缓存
// 边界:
//   - ✅ 缓存接口定义 (get / set)
//   - ✅ 进程内内存缓存
//   - ✅ 本地文件缓存（后台写入）
//   - ❌ 不应包含淘汰策略（缓存生命周期与进程一致）
//   - ❌ 不应包含网络请求
//   - ❌ 不应理解缓存内容的格式
//
// ============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::core::error::SourceError;

/// 缓存能力
///
/// 值以文本形式保存，由调用方负责序列化。读取到的内容可能已损坏，
/// 调用方在解析失败时应重新获取而不是报错。
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String);
}

/// 进程内缓存
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }
}

/// 本地文件缓存，条目保存在 `<root>/<key>`
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// 同步等待写入完成
    pub async fn write(&self, key: &str, value: &str) -> Result<(), SourceError> {
        write_entry(self.entry_path(key), value).await
    }
}

async fn write_entry(path: PathBuf, value: &str) -> Result<(), SourceError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, value).await?;
    Ok(())
}

#[async_trait]
impl Cache for FileCache {
    async fn get(&self, key: &str) -> Option<String> {
        tokio::fs::read_to_string(self.entry_path(key)).await.ok()
    }

    /// 后台写入，不阻塞调用方；写入失败只记录日志
    async fn set(&self, key: &str, value: String) {
        let path = self.entry_path(key);
        tokio::spawn(async move {
            if let Err(error) = write_entry(path.clone(), &value).await {
                tracing::warn!(path = %path.display(), %error, "failed to write cache entry");
            }
        });
    }
}
