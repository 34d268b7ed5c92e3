// ============================================================================
// CapsFix - Spinner 加载动画组件
// ============================================================================
//
// 文件: src/ui/spinner.rs
// 职责: 终端加载动画显示组件
// 边界:
//   - ✅ 加载动画显示和控制
//   - ✅ 多线程安全的状态管理
//   - ✅ 非终端输出时静默
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含网络请求
//
// ============================================================================

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::utils::colors::Colors;
use crate::utils::constants::spinner_chars;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner 加载动画组件
pub struct Spinner {
    /// 是否正在运行
    running: Arc<AtomicBool>,
    /// 显示的消息
    message: Arc<Mutex<String>>,
    /// 线程句柄
    handle: Option<thread::JoinHandle<()>>,
    /// 是否实际绘制（非终端或关闭进度显示时不绘制）
    enabled: bool,
}

impl Spinner {
    pub fn new(message: String, enabled: bool) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            message: Arc::new(Mutex::new(message)),
            handle: None,
            enabled: enabled && atty::is(atty::Stream::Stdout),
        }
    }

    /// 启动 Spinner
    pub fn start(&mut self) {
        if !self.enabled || self.running.load(Ordering::Relaxed) {
            return;
        }

        self.running.store(true, Ordering::Relaxed);

        let running = Arc::clone(&self.running);
        let message = Arc::clone(&self.message);

        let handle = thread::spawn(move || {
            let mut frame = 0;

            while running.load(Ordering::Relaxed) {
                let spinner_char = spinner_chars::BASE[frame % spinner_chars::BASE.len()];
                let text = message.lock().map(|m| m.clone()).unwrap_or_default();

                let mut stdout = io::stdout();
                let _ = write!(stdout, "\r\x1b[2K{} {}", Colors::info(&spinner_char.to_string()), text);
                let _ = stdout.flush();

                frame += 1;
                thread::sleep(FRAME_INTERVAL);
            }

            // 清除 spinner 行
            let mut stdout = io::stdout();
            let _ = write!(stdout, "\r\x1b[2K");
            let _ = stdout.flush();
        });

        self.handle = Some(handle);
    }

    /// 更新消息
    pub fn update_message(&self, new_message: String) {
        if let Ok(mut message) = self.message.lock() {
            *message = new_message;
        }
    }

    /// 停止 Spinner
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
