// ============================================================================
// CapsFix - 程序入口
// ============================================================================
//
// 文件: src/main.rs
// 职责: 初始化全局配置并启动 CLI
// 边界:
//   - ✅ 全局配置初始化
//   - ✅ 顶层错误输出与退出码
//   - ❌ 不应包含命令逻辑
//
// ============================================================================

use capsfix::cli::run_cli;
use capsfix::models::config::Config;
use capsfix::utils::logger::Logger;

#[tokio::main]
async fn main() {
    if let Err(e) = Config::initialize() {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }

    if let Err(e) = run_cli().await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
