//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `analysis/`, `utils/`
//! - 子模块: prepare, analyze, check, aggregate, upload, collect, clean

pub mod aggregate;
pub mod analyze;
pub mod check;
pub mod clean;
pub mod collect;
pub mod prepare;
pub mod upload;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Prepare(args) => prepare::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Aggregate(args) => aggregate::execute(args),
        Commands::Upload(args) => upload::execute(args),
        Commands::Collect(args) => collect::execute(args),
        Commands::Clean(args) => clean::execute(args),
    }
}
