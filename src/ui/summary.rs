// ============================================================================
// CapsFix - 结果汇总组件
// ============================================================================
//
// 文件: src/ui/summary.rs
// 职责: 构建 / 统计 / 校验结果的汇总显示
// 边界:
//   - ✅ 构建结果汇总（按版本对齐）
//   - ✅ 统计信息格式化输出
//   - ✅ 校验报告输出
//   - ✅ 国际化文本支持
//   - ❌ 不应包含具体业务逻辑
//   - ❌ 不应包含文件操作
//
// ============================================================================

use std::io::{self, Write};

use crate::core::builder::ValidationReport;
use crate::core::pack::EmittedPack;
use crate::core::stats::FixStats;
use crate::models::language::LanguageFileBundle;
use crate::models::version::VersionId;
use crate::utils::colors::Colors;
use crate::utils::constants::icons;
use crate::utils::logger::Logger;
use crate::utils::styles::TextStyles;
use crate::{t, tf};

// ============================================================================
// 构建结果汇总
// ============================================================================

/// 每个版本一行：`版本: 语言 (键数量), ...`，版本名按最长的对齐
pub fn format_build_lines(versions: &[VersionId], bundle: &LanguageFileBundle) -> Vec<String> {
    let longest = versions.iter().map(|v| v.len()).max().unwrap_or(0);

    versions
        .iter()
        .filter_map(|version| {
            let languages = bundle.get(version)?;
            let entries = languages
                .iter()
                .map(|(language, data)| format!("{} ({})", language, data.len()))
                .collect::<Vec<_>>()
                .join(", ");
            let label = format!("{}:", version);
            Some(format!("  {:<width$} {}", label, entries, width = longest + 1))
        })
        .collect()
}

/// 渲染构建结果汇总
pub fn render_build_summary(versions: &[VersionId], bundle: &LanguageFileBundle) {
    Logger::info(tf!("build.generated_versions", bundle.len()));
    for line in format_build_lines(versions, bundle) {
        Logger::info(line);
    }
}

/// 渲染已写出的资源包
pub fn render_packs(packs: &[EmittedPack]) {
    Logger::info("");
    Logger::info(TextStyles::bold(&t!("build.packs_header")));
    Logger::info("═══════════════════════════════════════");
    for pack in packs {
        Logger::info(format!(
            "{} {} {} {}",
            icons::PACKAGE,
            pack.name,
            icons::ARROW,
            Colors::muted(&pack.path.display().to_string())
        ));
    }
    let _ = io::stdout().flush();
}

// ============================================================================
// 统计信息
// ============================================================================

pub fn render_stats(scope: &str, stats: &FixStats) {
    Logger::info(tf!("stats.header", scope));
    Logger::info(tf!("stats.bug_reports", stats.bug_report_count()));
    Logger::info(tf!("stats.translation_keys", stats.translation_key_count()));
}

// ============================================================================
// 校验报告
// ============================================================================

pub fn render_validation_report(report: &ValidationReport) {
    Logger::info("");
    Logger::info(TextStyles::bold(&t!("validate.summary")));
    Logger::info("───────────────────────────────────────");
    Logger::info(format!("{} {}", icons::CHECK, tf!("validate.checked", report.checked)));

    for redirect in &report.redirects {
        Logger::warn(tf!(
            "validate.redirect",
            redirect.key,
            redirect.from,
            icons::ARROW,
            redirect.to
        ));
    }

    for warning in &report.warnings {
        Logger::warn(format!("{} {}", icons::WARNING, warning));
    }

    for failure in &report.failures {
        Logger::error(tf!(
            "validate.failure",
            icons::ERROR,
            failure.key,
            failure.bug,
            failure.message
        ));
    }

    if report.is_success() {
        Logger::success(format!("{} {}", icons::SUCCESS, t!("validate.passed")));
    } else {
        Logger::error(tf!("validate.failed", report.failures.len()));
    }
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::LanguageFileData;

    #[test]
    fn build_lines_are_aligned() {
        let mut bundle = LanguageFileBundle::new();
        let mut data = LanguageFileData::new();
        data.insert("gui.yes".to_string(), "Yes!".to_string());
        for version in ["1.20", "1.19.4-pre1"] {
            let languages = bundle.entry(version.to_string()).or_default();
            languages.insert("en_gb".to_string(), data.clone());
            languages.insert("en_us".to_string(), LanguageFileData::new());
        }

        let versions = vec!["1.19.4-pre1".to_string(), "1.20".to_string()];
        let lines = format_build_lines(&versions, &bundle);
        assert_eq!(
            lines,
            vec![
                "  1.19.4-pre1: en_gb (1), en_us (0)".to_string(),
                "  1.20:        en_gb (1), en_us (0)".to_string(),
            ]
        );
    }
}
