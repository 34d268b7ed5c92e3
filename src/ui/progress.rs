// ============================================================================
// CapsFix - 进度条组件
// ============================================================================
//
// 文件: src/ui/progress.rs
// 职责: 生成任务的进度条显示
// 边界:
//   - ✅ indicatif 进度条创建与样式
//   - ✅ 转换为调度器进度回调
//   - ❌ 不应包含任务执行逻辑
//
// ============================================================================

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;

use crate::core::scheduler::ProgressCallback;
use crate::utils::constants::progress_chars;

const TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan}] {pos}/{len} {msg}";

/// 生成任务进度条
#[derive(Clone)]
pub struct BuildProgress {
    bar: ProgressBar,
}

impl BuildProgress {
    /// `enabled` 为 false 时进度条隐藏，但计数仍然有效
    pub fn new(total: usize, message: String, enabled: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if !enabled || !atty::is(atty::Stream::Stderr) {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars::BAR);
        bar.set_style(style);
        bar.set_message(message);

        Self { bar }
    }

    /// 调度器进度回调
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |completed, _total| bar.set_position(completed as u64))
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_moves_the_bar() {
        let progress = BuildProgress::new(4, "generating".to_string(), false);
        let callback = progress.callback();
        callback(1, 4);
        callback(3, 4);
        assert_eq!(progress.position(), 3);
        progress.finish();
    }
}
