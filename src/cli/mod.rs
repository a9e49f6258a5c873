//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `prepare`: 生成 RASPA 输入文件（嵌套子命令）
//! - `analyze`: 输出后处理（嵌套子命令）
//! - `check`: 检查 MD 模拟结束状态
//! - `aggregate`: 聚合多材料 JSON 结果
//! - `upload`: 上传物性到材料数据库
//! - `collect`: 从聚合压缩包提取物性表格
//! - `clean`: 清理重启前的临时目录
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: prepare, analyze, check, aggregate, upload, collect, clean

pub mod aggregate;
pub mod analyze;
pub mod check;
pub mod clean;
pub mod collect;
pub mod prepare;
pub mod upload;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Raspaflow - RASPA 吸附/扩散模拟工作流工具箱
#[derive(Parser)]
#[command(name = "raspaflow")]
#[command(version)]
#[command(about = "Workflow toolkit for RASPA gas adsorption and diffusion simulations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate RASPA simulation input files
    Prepare(prepare::PrepareArgs),

    /// Post-process RASPA simulation output
    Analyze(analyze::AnalyzeArgs),

    /// Check that a molecular dynamics run finished cleanly
    Check(check::CheckArgs),

    /// Bundle per-material JSON results into a tar archive
    Aggregate(aggregate::AggregateArgs),

    /// Upload figures-of-merit to the materials database
    Upload(upload::UploadArgs),

    /// Extract an aggregate archive into a property table
    Collect(collect::CollectArgs),

    /// Remove scratch directories before restarting a simulation
    Clean(clean::CleanArgs),
}

/// 框架 CIF 文件的来源数据库
///
/// 值即 `<framework_folder>` 下的子目录名。
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FrameworkSource {
    #[value(name = "local")]
    Local,
    #[value(name = "CSD")]
    Csd,
    #[value(name = "hMOF")]
    HMof,
    #[value(name = "BWDB")]
    Bwdb,
    #[value(name = "BW20K")]
    Bw20k,
    #[value(name = "ABC-6")]
    Abc6,
    #[value(name = "ARABG")]
    Arabg,
    #[value(name = "ARC-MOF")]
    ArcMof,
    #[value(name = "DEEM2011")]
    Deem2011,
    #[value(name = "CoRE2019")]
    Core2019,
    #[value(name = "CoRE_DDEC")]
    CoreDdec,
    #[value(name = "generated")]
    Generated,
    #[value(name = "CURATED-COF")]
    CuratedCof,
    #[value(name = "baburin_2008")]
    Baburin2008,
    #[value(name = "simperler_2005")]
    Simperler2005,
    #[value(name = "database_zeolite_structures")]
    DatabaseZeoliteStructures,
}

impl std::fmt::Display for FrameworkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FrameworkSource::Local => "local",
            FrameworkSource::Csd => "CSD",
            FrameworkSource::HMof => "hMOF",
            FrameworkSource::Bwdb => "BWDB",
            FrameworkSource::Bw20k => "BW20K",
            FrameworkSource::Abc6 => "ABC-6",
            FrameworkSource::Arabg => "ARABG",
            FrameworkSource::ArcMof => "ARC-MOF",
            FrameworkSource::Deem2011 => "DEEM2011",
            FrameworkSource::Core2019 => "CoRE2019",
            FrameworkSource::CoreDdec => "CoRE_DDEC",
            FrameworkSource::Generated => "generated",
            FrameworkSource::CuratedCof => "CURATED-COF",
            FrameworkSource::Baburin2008 => "baburin_2008",
            FrameworkSource::Simperler2005 => "simperler_2005",
            FrameworkSource::DatabaseZeoliteStructures => "database_zeolite_structures",
        };
        write!(f, "{}", name)
    }
}

/// 四种相互作用势的截断半径
///
/// RASPA 的超胞尺寸由其中最大者决定。
#[derive(Args, Debug, Clone, Copy)]
pub struct CutoffArgs {
    /// The cutoff of the Van der Waals potential [Angstrom]
    #[arg(long, default_value_t = 12.8)]
    pub cutoff_vdw: f64,

    /// The cutoff of the charge-charge potential [Angstrom]
    #[arg(long, default_value_t = 12.8)]
    pub cutoff_charge_charge: f64,

    /// The cutoff of the charge-bonddipole potential [Angstrom]
    #[arg(long, default_value_t = 12.8)]
    pub cutoff_charge_bonddipole: f64,

    /// The cutoff of the bonddipole-bonddipole potential [Angstrom]
    #[arg(long, default_value_t = 12.8)]
    pub cutoff_bonddipole_bonddipole: f64,
}

impl CutoffArgs {
    /// 最大的截断半径
    pub fn largest(&self) -> f64 {
        self.cutoff_vdw
            .max(self.cutoff_charge_charge)
            .max(self.cutoff_charge_bonddipole)
            .max(self.cutoff_bonddipole_bonddipole)
    }
}

/// 能量网格间距参数
#[derive(Args, Debug, Clone, Copy)]
pub struct GridSpacingArgs {
    /// The grid spacing of the Van der Waals potentials [Angstrom]
    #[arg(long, default_value_t = 0.1)]
    pub spacing_vdw_grid: f64,

    /// The grid spacing of the Coulomb potential [Angstrom]
    #[arg(long, default_value_t = 0.1)]
    pub spacing_coulomb_grid: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_cutoff() {
        let cutoffs = CutoffArgs {
            cutoff_vdw: 12.8,
            cutoff_charge_charge: 14.0,
            cutoff_charge_bonddipole: 12.0,
            cutoff_bonddipole_bonddipole: 12.8,
        };
        assert!((cutoffs.largest() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_framework_source_directory_names() {
        assert_eq!(FrameworkSource::Core2019.to_string(), "CoRE2019");
        assert_eq!(FrameworkSource::Baburin2008.to_string(), "baburin_2008");
    }
}
