// ============================================================================
// CapsFix - CLI 模块
// ============================================================================
//
// 文件: src/cli/mod.rs
// 职责: CLI 命令行接口模块入口和路由
// 边界:
//   - ✅ CLI 结构定义和命令枚举
//   - ✅ 全局参数合并到配置
//   - ✅ 日志与颜色初始化
//   - ✅ 命令路由分发
//   - ❌ 不应包含具体命令实现逻辑
//   - ❌ 不应包含业务逻辑处理
//
// ============================================================================

pub mod build;
pub mod init;
pub mod services;
pub mod stats;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::models::config::{Config, RuntimeArgs};
use crate::utils::colors::Colors;
use crate::utils::logger::init_tracing;
use build::{handle_build, BuildArgs};
use init::{handle_init, InitArgs};
use stats::{handle_stats, StatsArgs};
use validate::handle_validate;

/// CapsFix - Minecraft translation fixes resource pack builder
#[derive(Debug, Parser)]
#[command(name = "capsfix")]
#[command(about = "Builds resource packs that fix capitalisation and wording in Minecraft's translation strings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Global verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Interface language (zh_cn, en_us)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Maximum concurrency
    #[arg(short = 'j', long, global = true)]
    pub max_concurrency: Option<usize>,

    /// Task timeout (seconds)
    #[arg(long, global = true)]
    pub timeout: Option<u32>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate fixes and build resource packs
    Build(BuildArgs),
    /// Count fixed bugs and translation keys
    Stats(StatsArgs),
    /// Check linked bug reports against the bug tracker
    Validate,
    /// Initialize configuration file
    Init(InitArgs),
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Build runtime args to override config
    let runtime_args = build_runtime_args(&cli);
    // Merge runtime args to global config
    Config::merge_runtime_args(runtime_args)?;

    let colored = Config::get_colored();
    Colors::set_enabled(colored);
    init_tracing(Config::get_verbose(), colored);

    match cli.command {
        Commands::Build(args) => handle_build(args).await,
        Commands::Stats(args) => handle_stats(args).await,
        Commands::Validate => handle_validate().await,
        Commands::Init(args) => handle_init(args),
    }
}

/// Build runtime args from CLI arguments
fn build_runtime_args(cli: &Cli) -> RuntimeArgs {
    let output_dir = match &cli.command {
        Commands::Build(args) => args.output.clone(),
        _ => None,
    };

    RuntimeArgs {
        verbose: if cli.verbose { Some(true) } else { None },
        colored: if cli.no_color { Some(false) } else { None },
        show_progress: if cli.no_progress { Some(false) } else { None },
        max_concurrency: cli.max_concurrency,
        task_timeout: cli.timeout,
        language: cli.language.clone(),
        output_dir,
    }
}
