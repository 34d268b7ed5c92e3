// ============================================================================
// CapsFix - 服务装配
// ============================================================================
//
// 文件: src/cli/services.rs
// 职责: 根据配置创建外部能力与核心服务
// 边界:
//   - ✅ 文件缓存 / HTTP 客户端 / 版本解析器装配
//   - ✅ 调度器配置
//   - ❌ 不应包含命令逻辑
//
// ============================================================================

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::core::cache::{Cache, FileCache};
use crate::core::generator::TranslationGenerator;
use crate::core::scheduler::SchedulerConfig;
use crate::core::versions::VersionResolver;
use crate::models::config::Config;
use crate::providers::{BugTracker, CachedLanguageFiles, LanguageFileSource, MojangClient, MojiraClient};
use crate::t;

/// 一次命令运行所需的服务
pub struct Services {
    pub config: Config,
    pub resolver: Arc<VersionResolver>,
    pub language_files: Arc<dyn LanguageFileSource>,
    pub bug_tracker: Arc<dyn BugTracker>,
}

impl Services {
    pub fn from_config(config: Config) -> Result<Self> {
        let cache: Arc<dyn Cache> = Arc::new(FileCache::new(&config.network.cache_dir));
        let mojang = Arc::new(MojangClient::new(&config.network).context(t!("error.services"))?);
        let mojira = Arc::new(MojiraClient::new(&config.network).context(t!("error.services"))?);

        let resolver = Arc::new(VersionResolver::new(mojang.clone(), Arc::clone(&cache)));
        let language_files: Arc<dyn LanguageFileSource> =
            Arc::new(CachedLanguageFiles::new(mojang, cache));

        Ok(Self {
            config,
            resolver,
            language_files,
            bug_tracker: mojira,
        })
    }

    pub fn generator(&self) -> TranslationGenerator {
        TranslationGenerator::new(Arc::clone(&self.resolver), Arc::clone(&self.language_files))
            .with_fallback_language(self.config.build.fallback_language.clone())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        scheduler_config(&self.config)
    }
}

/// 由执行配置得到调度器配置
pub fn scheduler_config(config: &Config) -> SchedulerConfig {
    let defaults = SchedulerConfig::default();
    SchedulerConfig {
        max_concurrency: match config.execution.max_concurrency {
            0 => defaults.max_concurrency,
            n => n,
        },
        timeout: config.execution.timeout(),
        ..defaults
    }
}
