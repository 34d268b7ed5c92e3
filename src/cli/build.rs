// ============================================================================
// CapsFix - 构建命令处理
// ============================================================================
//
// 文件: src/cli/build.rs
// 职责: 校验规则、生成翻译文本并写出资源包
// 边界:
//   - ✅ 构建命令参数解析
//   - ✅ 构建流程编排（校验 → 生成 → 输出）
//   - ✅ 进度与结果显示
//   - ❌ 不应包含翻译修改逻辑
//   - ❌ 不应包含资源包格式细节
//
// ============================================================================

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::services::Services;
use crate::cli::validate::run_validation;
use crate::core::builder::{apply_redirects, BuildOrchestrator};
use crate::core::pack::{write_packs, PackOptions};
use crate::core::scheduler::SchedulerConfig;
use crate::fixes::default_fixes;
use crate::models::config::Config;
use crate::ui::progress::BuildProgress;
use crate::ui::summary::{render_build_summary, render_packs, render_validation_report};
use crate::utils::constants::icons;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 构建命令参数
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// 资源包发布版本；不指定时构建开发版本
    #[arg(short, long)]
    pub pack_version: Option<String>,

    /// 输出目录
    #[arg(short, long)]
    pub output: Option<String>,

    /// 跳过漏洞报告校验
    #[arg(long)]
    pub skip_validation: bool,

    /// 保留输出目录中已有的文件
    #[arg(long)]
    pub no_clear: bool,
}

/// 处理构建命令
pub async fn handle_build(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();
    Logger::info(format!("{} {}", icons::BUILD, t!("build.start")));

    let config = Config::snapshot()?;
    let services = Services::from_config(config.clone())?;

    let mut fixes = default_fixes().context(t!("error.load_fixes"))?;
    Logger::info(tf!("build.loaded_fixes", fixes.len()));

    if args.skip_validation {
        Logger::warn(t!("build.skip_validation"));
    } else {
        let report = run_validation(&services, &fixes).await;
        render_validation_report(&report);
        if !report.is_success() {
            bail!(tf!("validate.failed", report.failures.len()));
        }
        fixes = apply_redirects(&fixes, &report.redirects);
    }

    if args.pack_version.is_none() {
        Logger::warn(t!("build.development_variant"));
    }

    let orchestrator = BuildOrchestrator::new(Arc::new(services.generator()));
    let targets = orchestrator
        .target_versions(&config.build.versions)
        .await
        .context(t!("error.generate"))?;
    let languages = config.build.languages.clone();
    Logger::info(tf!("build.targets", targets.len(), languages.len()));

    let progress = BuildProgress::new(
        targets.len() * languages.len(),
        t!("build.generating"),
        config.output.show_progress,
    );
    let orchestrator = orchestrator.with_scheduler_config(SchedulerConfig {
        progress_callback: Some(progress.callback()),
        ..services.scheduler_config()
    });
    let generated = orchestrator
        .generate(&config.build.versions, &languages, Arc::new(fixes))
        .await;
    progress.finish();
    let bundle = generated.context(t!("error.generate"))?;

    render_build_summary(&targets, &bundle);

    let catalog = services.resolver.catalog().await.context(t!("error.catalog"))?;
    let options = pack_options(&args, &config);
    let packs = write_packs(&bundle, &catalog, &options)?;
    render_packs(&packs);

    Logger::success(format!(
        "{} {}",
        icons::SUCCESS,
        tf!(
            "build.completed",
            packs.len(),
            options.output_dir.display(),
            format!("{:.2}", start_time.elapsed().as_secs_f64())
        )
    ));
    Ok(())
}

/// 由命令参数与配置得到资源包输出选项
fn pack_options(args: &BuildArgs, config: &Config) -> PackOptions {
    PackOptions {
        output_dir: PathBuf::from(&config.build.output_dir),
        clear_directory: config.build.clear_directory && !args.no_clear,
        pack_version: args.pack_version.clone(),
        description: config.build.pack_description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clear_flag_keeps_existing_output() {
        let config = Config::default();
        let args = BuildArgs {
            pack_version: Some("2.1".to_string()),
            output: None,
            skip_validation: false,
            no_clear: true,
        };
        let options = pack_options(&args, &config);
        assert!(!options.clear_directory);
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.pack_name("1.19.4"), "Capitalisation-Fixes-2.1-1.19.4");
    }
}
