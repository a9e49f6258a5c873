//! # prepare 子命令 CLI 定义
//!
//! RASPA 输入文件生成的统一入口，包含四个子命令：
//! - `supercell`: P1 对称性超胞构建输入
//! - `grid`: 能量网格预计算输入
//! - `gcmc`: 巨正则蒙特卡洛吸附模拟输入
//! - `md`: NVT 分子动力学扩散模拟输入
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prepare/` 相应模块

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::{CutoffArgs, FrameworkSource, GridSpacingArgs};
use crate::models::{Composition, Replication};

/// prepare 主命令参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(subcommand)]
    pub command: PrepareCommands,
}

/// prepare 子命令
#[derive(Subcommand, Debug)]
pub enum PrepareCommands {
    /// Write the input file for a P1-symmetry supercell construction run
    Supercell(SupercellArgs),

    /// Write the input file for an energy-grid precomputation run
    Grid(GridArgs),

    /// Write the input file for a GCMC adsorption run
    Gcmc(GcmcArgs),

    /// Write the input file for an NVT molecular dynamics run
    Md(MdArgs),
}

/// supercell 子命令参数
#[derive(Args, Debug)]
pub struct SupercellArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Source of the CIF file describing the nanoporous material structure
    #[arg(long, value_enum)]
    pub framework_source: FrameworkSource,

    /// Location of the framework <source>/<name>.cif files
    #[arg(long)]
    pub framework_folder: PathBuf,

    /// Reading CIF files, the number is removed from the framework atom labels
    #[arg(long, default_value_t = false)]
    pub remove_atom_number_code: bool,

    #[command(flatten)]
    pub cutoffs: CutoffArgs,

    /// Number of unit cell replications in the supercell (comma-separated, e.g. "2,2,3")
    #[arg(long)]
    pub unit_cells: Option<Replication>,
}

/// grid 子命令参数
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Location of the force field *.def files
    #[arg(long, env = "FORCEFIELD_DIR")]
    pub forcefield_folder: PathBuf,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    #[command(flatten)]
    pub cutoffs: CutoffArgs,

    /// Ewald sum precision used to calculate the amount of wave vectors
    #[arg(long, default_value_t = 1.0e-6)]
    pub ewald_precision: f64,

    #[command(flatten)]
    pub spacing: GridSpacingArgs,
}

/// gcmc 子命令参数
#[derive(Args, Debug)]
pub struct GcmcArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Number of Monte Carlo initialization cycles
    #[arg(long, default_value_t = 0)]
    pub init_cycles: u64,

    /// Total number of Monte Carlo simulation cycles
    #[arg(long, default_value_t = 10_000)]
    pub cycles: u64,

    /// Print the loadings and energies every 'PRINT_EVERY' cycles
    #[arg(long, default_value_t = 1)]
    pub print_every: u64,

    /// Write restart file every 'RESTART_FILE_EVERY' cycles
    #[arg(long, default_value_t = 1000)]
    pub restart_file_every: u64,

    /// Location of the force field *.def files
    #[arg(long, env = "FORCEFIELD_DIR")]
    pub forcefield_folder: PathBuf,

    #[command(flatten)]
    pub cutoffs: CutoffArgs,

    /// Ewald sum precision used to calculate the amount of wave vectors
    #[arg(long, default_value_t = 1.0e-6)]
    pub ewald_precision: f64,

    /// Ignore the partial atomic charges already in the CIF file
    #[arg(long, default_value_t = false)]
    pub ignore_charges_from_cif: bool,

    /// The void fraction measured by probing the structure with He at 300 K
    #[arg(long, default_value_t = 0.0)]
    pub helium_void_fraction: f64,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// External pressure [Pascal]. Accepts a comma-separated list of values
    #[arg(long, default_value = "101325")]
    pub pressure: String,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// Use a pre-calculated grid for the energy and forces
    #[arg(long, default_value_t = false)]
    pub use_tabular_grid: bool,

    #[command(flatten)]
    pub spacing: GridSpacingArgs,

    /// Write snapshots of the simulation every 'MOVIES_EVERY' cycles
    #[arg(long, default_value_t = 0)]
    pub movies_every: u64,
}

/// md 子命令参数
#[derive(Args, Debug)]
pub struct MdArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Number of Monte Carlo initialization cycles
    #[arg(long, default_value_t = 1000)]
    pub init_cycles: u64,

    /// Number of molecular dynamics equilibration cycles
    #[arg(long, default_value_t = 1000)]
    pub equilibration_cycles: u64,

    /// Number of molecular dynamics simulation cycles
    #[arg(long, default_value_t = 5_000_000)]
    pub cycles: u64,

    /// Print the loadings and energies every 'PRINT_EVERY' cycles
    #[arg(long, default_value_t = 10_000)]
    pub print_every: u64,

    /// Write restart file every 'RESTART_FILE_EVERY' cycles
    #[arg(long, default_value_t = 10_000)]
    pub restart_file_every: u64,

    /// Time step [ps] used in the molecular dynamics simulation
    #[arg(long, default_value_t = 1.0e-2)]
    pub time_step: f64,

    /// Location of the force field *.def files
    #[arg(long, env = "FORCEFIELD_DIR")]
    pub forcefield_folder: PathBuf,

    #[command(flatten)]
    pub cutoffs: CutoffArgs,

    /// Ewald sum precision used to calculate the amount of wave vectors
    #[arg(long, default_value_t = 1.0e-6)]
    pub ewald_precision: f64,

    /// Ignore the partial atomic charges already in the CIF file
    #[arg(long, default_value_t = false)]
    pub ignore_charges_from_cif: bool,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// Use a pre-calculated grid for the energy and forces
    #[arg(long, default_value_t = false)]
    pub use_tabular_grid: bool,

    #[command(flatten)]
    pub spacing: GridSpacingArgs,

    /// Write snapshots of the simulation every 'MOVIES_EVERY' cycles
    #[arg(long, default_value_t = 0)]
    pub movies_every: u64,

    /// Total number of molecules created inside the supercell
    /// (computed from the cell volume when omitted)
    #[arg(long)]
    pub molecules: Option<u64>,

    /// Print the mean squared displacement every 'PRINT_MSD_EVERY' cycles
    #[arg(long, default_value_t = 1000)]
    pub print_msd_every: u64,
}
