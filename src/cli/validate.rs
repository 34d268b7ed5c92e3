// ============================================================================
// CapsFix - 校验命令处理
// ============================================================================
//
// 文件: src/cli/validate.rs
// 职责: 校验修复规则关联的漏洞报告
// 边界:
//   - ✅ 校验命令入口
//   - ✅ 校验过程的进度显示与报告输出
//   - ✅ 供构建命令复用的校验流程
//   - ❌ 不应包含具体校验规则
//   - ❌ 不应包含网络请求细节
//
// ============================================================================

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::cli::services::Services;
use crate::core::builder::{validate_fixes, ValidationReport};
use crate::core::fix::Fix;
use crate::fixes::default_fixes;
use crate::models::config::Config;
use crate::ui::spinner::Spinner;
use crate::ui::summary::render_validation_report;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 处理校验命令
pub async fn handle_validate() -> Result<()> {
    Logger::info(t!("validate.start"));

    let services = Services::from_config(Config::snapshot()?)?;
    let fixes = default_fixes().context(t!("error.load_fixes"))?;

    let report = run_validation(&services, &fixes).await;
    render_validation_report(&report);

    if !report.is_success() {
        bail!(tf!("validate.failed", report.failures.len()));
    }
    Ok(())
}

/// 带进度提示地校验规则列表
pub async fn run_validation(services: &Services, fixes: &[Fix]) -> ValidationReport {
    let linked = fixes.iter().filter(|fix| fix.bug().is_some()).count();
    let mut spinner = Spinner::new(
        tf!("validate.spinner", linked),
        services.config.output.show_progress,
    );
    spinner.start();

    let report = validate_fixes(
        fixes,
        Arc::clone(&services.bug_tracker),
        Arc::clone(&services.resolver),
        services.scheduler_config(),
    )
    .await;

    spinner.stop();
    report
}
