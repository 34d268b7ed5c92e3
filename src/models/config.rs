// ============================================================================
// CapsFix - 配置数据模型
// ============================================================================
//
// 文件: src/models/config.rs
// 职责: 配置文件数据结构定义和操作
// 边界:
//   - ✅ 配置文件数据结构定义
//   - ✅ 配置序列化/反序列化
//   - ✅ 配置默认值
//   - ✅ 配置文件读写操作
//   - ✅ 全局配置的读取与运行时参数合并
//   - ❌ 不应包含构建逻辑
//   - ❌ 不应包含 CLI 参数解析
//   - ❌ 不应包含网络请求
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::models::version::{VersionBranch, VersionSpecifier};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "capsfix.toml";

/// 全局配置管理器
static GLOBAL_CONFIG: std::sync::OnceLock<Arc<RwLock<Config>>> = std::sync::OnceLock::new();

/// CapsFix 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 构建配置
    #[serde(default)]
    pub build: BuildConfig,
    /// 网络与缓存配置
    #[serde(default)]
    pub network: NetworkConfig,
    /// 执行配置
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
    /// 国际化配置
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// 构建配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// 目标语言
    #[serde(default = "Config::default_languages")]
    pub languages: Vec<String>,
    /// 目标版本
    #[serde(default = "Config::default_versions")]
    pub versions: VersionSpecifier,
    /// 输出目录
    #[serde(default = "Config::default_output_dir")]
    pub output_dir: String,
    /// 构建前是否清空输出目录
    #[serde(default = "Config::default_clear_directory")]
    pub clear_directory: bool,
    /// pack.mcmeta 中的描述
    #[serde(default = "Config::default_pack_description")]
    pub pack_description: String,
    /// 原版文本缺失时的后备语言
    #[serde(default = "Config::default_fallback_language")]
    pub fallback_language: String,
}

/// 网络与缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 本地缓存目录
    #[serde(default = "Config::default_cache_dir")]
    pub cache_dir: String,
    /// 版本清单地址
    #[serde(default = "Config::default_manifest_url")]
    pub manifest_url: String,
    /// 语言文件地址模板，支持 `{version}` 与 `{language}` 占位符
    #[serde(default = "Config::default_assets_url")]
    pub assets_url: String,
    /// 漏洞追踪系统地址
    #[serde(default = "Config::default_bug_tracker_url")]
    pub bug_tracker_url: String,
    /// HTTP User-Agent
    #[serde(default = "Config::default_user_agent")]
    pub user_agent: String,
}

/// 执行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// 最大并发数
    #[serde(default = "Config::default_max_concurrency")]
    pub max_concurrency: usize,
    /// 单个 (版本, 语言) 生成任务的超时时间（秒），0 表示不限制
    #[serde(default)]
    pub task_timeout: u32,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 是否显示进度条
    #[serde(default = "Config::default_show_progress")]
    pub show_progress: bool,
    /// 是否详细输出
    #[serde(default)]
    pub verbose: bool,
    /// 是否彩色输出
    #[serde(default = "Config::default_colored")]
    pub colored: bool,
}

/// 国际化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// 界面语言
    #[serde(default = "Config::default_language")]
    pub language: String,
}

/// CLI 运行时参数（用于覆盖配置文件）
#[derive(Debug, Clone, Default)]
pub struct RuntimeArgs {
    pub verbose: Option<bool>,
    pub colored: Option<bool>,
    pub show_progress: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub task_timeout: Option<u32>,
    pub language: Option<String>,
    pub output_dir: Option<String>,
}

/// 配置默认值 trait - 不依赖全局配置初始化
pub trait ConfigDefaults {
    fn default_languages() -> Vec<String> {
        vec!["en_us".to_string(), "en_gb".to_string()]
    }

    fn default_versions() -> VersionSpecifier {
        VersionSpecifier::latest(VersionBranch::Snapshot)
    }

    fn default_output_dir() -> String {
        "out".to_string()
    }

    fn default_clear_directory() -> bool {
        true
    }

    fn default_pack_description() -> String {
        "Fixes issues with text labels.\nSource: §9§nbit.ly/CapsFix".to_string()
    }

    fn default_fallback_language() -> String {
        "en_us".to_string()
    }

    fn default_cache_dir() -> String {
        ".cache".to_string()
    }

    fn default_manifest_url() -> String {
        "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json".to_string()
    }

    fn default_assets_url() -> String {
        "https://raw.githubusercontent.com/InventivetalentDev/minecraft-assets/{version}/assets/minecraft/lang/{language}.json"
            .to_string()
    }

    fn default_bug_tracker_url() -> String {
        "https://bugs.mojang.com".to_string()
    }

    fn default_user_agent() -> String {
        format!("capsfix/{}", env!("CARGO_PKG_VERSION"))
    }

    /// 获取默认最大并发数
    fn default_max_concurrency() -> usize {
        num_cpus::get()
    }

    fn default_show_progress() -> bool {
        true
    }

    fn default_colored() -> bool {
        true
    }

    /// 获取默认界面语言
    fn default_language() -> String {
        "en_us".to_string()
    }
}

impl ConfigDefaults for Config {}

impl Config {
    /// 初始化全局配置（程序启动时调用）
    pub fn initialize() -> anyhow::Result<()> {
        let config = Self::load_config(Path::new(CONFIG_FILE_NAME))?;
        GLOBAL_CONFIG
            .set(Arc::new(RwLock::new(config)))
            .map_err(|_| anyhow::anyhow!("Global config already initialized"))?;
        Ok(())
    }

    /// 加载配置文件，文件不存在时使用默认配置
    pub fn load_config(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 合并运行时参数
    pub fn merge_runtime_args(args: RuntimeArgs) -> anyhow::Result<()> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let mut config = global_config
            .write()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config write lock"))?;

        config.apply_runtime_args(args);
        Ok(())
    }

    /// 将运行时参数覆盖到当前配置
    pub fn apply_runtime_args(&mut self, args: RuntimeArgs) {
        if let Some(verbose) = args.verbose {
            self.output.verbose = verbose;
        }
        if let Some(colored) = args.colored {
            self.output.colored = colored;
        }
        if let Some(show_progress) = args.show_progress {
            self.output.show_progress = show_progress;
        }
        if let Some(max_concurrency) = args.max_concurrency {
            self.execution.max_concurrency = max_concurrency;
        }
        if let Some(task_timeout) = args.task_timeout {
            self.execution.task_timeout = task_timeout;
        }
        if let Some(language) = args.language {
            self.i18n.language = language;
        }
        if let Some(output_dir) = args.output_dir {
            self.build.output_dir = output_dir;
        }
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &PathBuf) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 生成默认配置模板并保存到文件
    pub fn create_default_config_file(config_path: &PathBuf) -> anyhow::Result<()> {
        Self::default().save_to_file(config_path)
    }

    /// 获取当前全局配置的快照
    pub fn snapshot() -> anyhow::Result<Config> {
        Self::read_global(|config| config.clone())
    }

    /// 获取界面语言
    pub fn get_language() -> anyhow::Result<String> {
        Self::read_global(|config| config.i18n.language.clone())
    }

    /// 获取详细输出设置（带默认值）
    pub fn get_verbose() -> bool {
        Self::read_global(|config| config.output.verbose).unwrap_or(false)
    }

    /// 获取是否彩色输出（带默认值）
    pub fn get_colored() -> bool {
        Self::read_global(|config| config.output.colored).unwrap_or_else(|_| Self::default_colored())
    }

    /// 获取是否显示进度条（带默认值）
    pub fn get_show_progress() -> bool {
        Self::read_global(|config| config.output.show_progress)
            .unwrap_or_else(|_| Self::default_show_progress())
    }

    /// 获取最大并发数（带默认值）
    pub fn get_max_concurrency() -> usize {
        match Self::read_global(|config| config.execution.max_concurrency) {
            Ok(concurrency) if concurrency > 0 => concurrency,
            _ => Self::default_max_concurrency(),
        }
    }

    /// 在只读锁内读取全局配置
    fn read_global<T>(read: impl FnOnce(&Config) -> T) -> anyhow::Result<T> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let config = global_config
            .read()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config read lock"))?;

        Ok(read(&config))
    }
}

impl ExecutionConfig {
    /// 任务超时时长，0 表示不限制
    pub fn timeout(&self) -> Option<Duration> {
        match self.task_timeout {
            0 => None,
            seconds => Some(Duration::from_secs(u64::from(seconds))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            network: NetworkConfig::default(),
            execution: ExecutionConfig::default(),
            output: OutputConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            languages: Config::default_languages(),
            versions: Config::default_versions(),
            output_dir: Config::default_output_dir(),
            clear_directory: Config::default_clear_directory(),
            pack_description: Config::default_pack_description(),
            fallback_language: Config::default_fallback_language(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            cache_dir: Config::default_cache_dir(),
            manifest_url: Config::default_manifest_url(),
            assets_url: Config::default_assets_url(),
            bug_tracker_url: Config::default_bug_tracker_url(),
            user_agent: Config::default_user_agent(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Config::default_max_concurrency(),
            task_timeout: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_progress: Config::default_show_progress(),
            verbose: false,
            colored: Config::default_colored(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: Config::default_language(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::version::VersionRange;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.build.languages, vec!["en_us", "en_gb"]);
        assert_eq!(config.build.output_dir, "out");
        assert!(config.execution.timeout().is_none());
    }

    #[test]
    fn partial_file_keeps_unspecified_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[build]
languages = ["en_us"]
versions = { include = [{ only = "1.21.6-pre1" }] }

[execution]
task_timeout = 30
"#,
        )
        .unwrap();

        let config = Config::load_config(&path).unwrap();
        assert_eq!(config.build.languages, vec!["en_us"]);
        assert_eq!(
            config.build.versions,
            VersionSpecifier::Range(VersionRange::new().with_include(VersionRange::only("1.21.6-pre1")))
        );
        assert_eq!(config.build.fallback_language, "en_us");
        assert_eq!(config.execution.timeout(), Some(Duration::from_secs(30)));
        assert!(config.output.colored);
    }

    #[test]
    fn default_template_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        Config::create_default_config_file(&path).unwrap();
        let config = Config::load_config(&path).unwrap();
        assert_eq!(config.build.versions, Config::default_versions());
        assert_eq!(config.network.cache_dir, ".cache");
    }

    #[test]
    fn runtime_args_override_file_values() {
        let mut config = Config::default();
        config.apply_runtime_args(RuntimeArgs {
            verbose: Some(true),
            colored: Some(false),
            output_dir: Some("dist".to_string()),
            ..RuntimeArgs::default()
        });
        assert!(config.output.verbose);
        assert!(!config.output.colored);
        assert_eq!(config.build.output_dir, "dist");
    }
}
