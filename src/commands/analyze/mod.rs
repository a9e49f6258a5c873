//! # analyze 命令实现
//!
//! RASPA 输出后处理：逐周期 CSV 提取、MSER 平衡统计、
//! MSD 自扩散系数拟合。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 使用 `parsers/`, `analysis/`, `models/`
//! - 子模块: diffusion, equilibration, output

pub mod diffusion;
pub mod equilibration;
pub mod output;

use crate::cli::analyze::{AnalyzeArgs, AnalyzeCommands};
use crate::error::Result;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Output(args) => output::execute(args),
        AnalyzeCommands::Equilibration(args) => equilibration::execute(args),
        AnalyzeCommands::Diffusion(args) => diffusion::execute(args),
    }
}
