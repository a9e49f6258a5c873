//! # aggregate 子命令 CLI 定义
//!
//! 把多个输出目录中的物性 JSON 收集到当前目录并打包。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/aggregate.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// aggregate 主命令参数
#[derive(Args, Debug)]
pub struct AggregateArgs {
    #[command(subcommand)]
    pub command: AggregateCommands,
}

/// aggregate 子命令
#[derive(Subcommand, Debug)]
pub enum AggregateCommands {
    /// Bundle isotherm.json files into isotherms.tgz
    Isotherm(AggregateKindArgs),

    /// Bundle diffusion.json files into diffusion.tgz
    Diffusion(AggregateKindArgs),
}

/// 聚合参数，框架名与输出目录一一对应
#[derive(Args, Debug)]
pub struct AggregateKindArgs {
    /// Names of the CIF files describing the nanoporous material structures
    #[arg(long, required = true, num_args = 1..)]
    pub framework_name: Vec<String>,

    /// Directories containing the JSON output files, one per framework
    #[arg(long, required = true, num_args = 1..)]
    pub output_folders: Vec<PathBuf>,
}
