//! # analyze 子命令 CLI 定义
//!
//! 模拟输出后处理统一入口，包含三个子命令：
//! - `output`: RASPA 输出解析为逐周期 CSV
//! - `equilibration`: MSER 平衡检测与统计
//! - `diffusion`: MSD 曲线自扩散系数拟合
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze/` 相应模块

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analysis::equilibration::Uncertainty;
use crate::models::Composition;

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Convert a RASPA output file into a per-cycle loading CSV
    Output(OutputArgs),

    /// Locate the equilibrated region and compute averaged statistics
    Equilibration(EquilibrationArgs),

    /// Estimate self-diffusion coefficients from MSD curves
    Diffusion(DiffusionArgs),
}

/// output 子命令参数
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// Total number of Monte Carlo cycles executed in the simulation
    #[arg(long, default_value_t = 10_000)]
    pub cycles: u64,

    /// Print interval used in the simulation
    #[arg(long, default_value_t = 1)]
    pub print_every: u64,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// External pressure [Pascal]
    #[arg(long, default_value_t = 101_325)]
    pub pressure: u64,
}

/// 平衡段不确定度口径
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UncertaintyKind {
    /// Standard deviation of the equilibrated data
    Sd,
    /// Standard error of the mean
    Se,
    /// Standard deviation over uncorrelated samples
    #[value(name = "uSD")]
    USd,
    /// Standard error over uncorrelated samples
    #[value(name = "uSE")]
    USe,
}

impl From<UncertaintyKind> for Uncertainty {
    fn from(kind: UncertaintyKind) -> Self {
        match kind {
            UncertaintyKind::Sd => Uncertainty::Sd,
            UncertaintyKind::Se => Uncertainty::Se,
            UncertaintyKind::USd => Uncertainty::USd,
            UncertaintyKind::USe => Uncertainty::USe,
        }
    }
}

/// 平衡判定规则
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EquilibrationRule {
    /// Truncate every observable at the equilibration point of the total loading
    Global,
    /// Truncate each observable at its own equilibration point
    Individual,
}

/// equilibration 子命令参数
#[derive(Args, Debug)]
pub struct EquilibrationArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 298.0)]
    pub temperature: f64,

    /// External pressure [Pascal]. Accepts a comma-separated list of values
    #[arg(long, default_value = "101325")]
    pub pressures: String,

    /// Select the version of desired uncertainty
    #[arg(long, value_enum, default_value = "uSD")]
    pub uncertainty: UncertaintyKind,

    /// Select between global or individual equilibration for each component
    #[arg(long, value_enum, default_value = "global")]
    pub equilibration_rule: EquilibrationRule,

    /// Size of batch to take the average
    #[arg(long, default_value_t = 5)]
    pub batch_size: usize,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

/// diffusion 子命令参数
#[derive(Args, Debug)]
pub struct DiffusionArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// Total number of molecules created inside the supercell
    /// (computed from the cell volume when omitted)
    #[arg(long)]
    pub molecules: Option<u64>,

    /// Largest cutoff radius [Angstrom]
    #[arg(long, default_value_t = 12.8)]
    pub largest_cutoff: f64,

    /// Workflow instance directory, its last path segment is recorded as provenance
    #[arg(long, env = "INSTANCE_DIR")]
    pub instance_dir: String,

    /// Render a log-log MSD plot with the fitted regime highlighted
    #[arg(long, default_value_t = false)]
    pub plot: bool,
}
