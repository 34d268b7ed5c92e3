// ============================================================================
// CapsFix - 统计命令处理
// ============================================================================
//
// 文件: src/cli/stats.rs
// 职责: 统计修复规则覆盖的漏洞与翻译键
// 边界:
//   - ✅ 统计命令参数解析
//   - ✅ 版本范围选择（全部 / 最新正式版 / 最新快照）
//   - ❌ 不应包含统计算法
//
// ============================================================================

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::services::Services;
use crate::core::stats::{generate_stats, StatsFilter};
use crate::fixes::default_fixes;
use crate::models::config::Config;
use crate::models::version::{VersionBranch, VersionSpecifier};
use crate::ui::summary::render_stats;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 统计命令参数
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// 只统计最新正式版
    #[arg(long, conflicts_with = "latest_snapshot")]
    pub latest_release: bool,

    /// 只统计最新快照
    #[arg(long)]
    pub latest_snapshot: bool,
}

impl StatsArgs {
    fn branch(&self) -> Option<VersionBranch> {
        if self.latest_release {
            Some(VersionBranch::Release)
        } else if self.latest_snapshot {
            Some(VersionBranch::Snapshot)
        } else {
            None
        }
    }
}

/// 处理统计命令
pub async fn handle_stats(args: StatsArgs) -> Result<()> {
    Logger::info(t!("stats.start"));

    let config = Config::snapshot()?;
    let services = Services::from_config(config.clone())?;
    let fixes = default_fixes().context(t!("error.load_fixes"))?;

    let (filter, scope) = match args.branch() {
        Some(branch) => (
            StatsFilter {
                versions: Some(VersionSpecifier::latest(branch)),
                languages: Some(config.build.languages.clone()),
            },
            tf!("stats.scope_latest", branch),
        ),
        None => (
            StatsFilter {
                versions: Some(config.build.versions.clone()),
                languages: Some(config.build.languages.clone()),
            },
            t!("stats.scope_all"),
        ),
    };

    let stats = generate_stats(&fixes, &filter, &services.resolver)
        .await
        .context(t!("error.catalog"))?;
    render_stats(&scope, &stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_selection() {
        let args = StatsArgs {
            latest_release: true,
            latest_snapshot: false,
        };
        assert_eq!(args.branch(), Some(VersionBranch::Release));

        let args = StatsArgs {
            latest_release: false,
            latest_snapshot: false,
        };
        assert_eq!(args.branch(), None);
    }
}
