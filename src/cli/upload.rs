//! # upload 子命令 CLI 定义
//!
//! 上传物性数据到材料数据库。`INGRESS_SUBDOMAIN` 为空或保留占位符
//! `${INGRESS}` 时跳过 REST 调用，只写本地 JSON。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/upload.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::FrameworkSource;
use crate::models::Composition;

/// upload 主命令参数
#[derive(Args, Debug)]
pub struct UploadArgs {
    #[command(subcommand)]
    pub command: UploadCommands,
}

/// upload 子命令
#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Upload adsorption isotherm figures-of-merit
    Adsorption(AdsorptionArgs),

    /// Upload diffusion figures-of-merit
    Diffusion(DiffusionUploadArgs),
}

/// adsorption 上传参数
#[derive(Args, Debug)]
pub struct AdsorptionArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Source of the CIF file describing the nanoporous material structure
    #[arg(long, value_enum)]
    pub framework_source: FrameworkSource,

    /// External temperature [Kelvin]
    #[arg(long, default_value_t = 298.0)]
    pub temperature: f64,

    /// External pressure [Pascal]. Accepts a comma-separated list of values
    #[arg(long, default_value = "101325")]
    pub pressures: String,

    /// Dictionary containing flue gas component names and fractions
    #[arg(long, default_value = r#"{"CO2": 1.0}"#)]
    pub composition: Composition,

    /// Ingress subdomain of the materials database API
    #[arg(long, env = "INGRESS_SUBDOMAIN")]
    pub ingress_subdomain: Option<String>,

    /// Workflow instance directory, its last path segment is recorded as provenance
    #[arg(long, env = "INSTANCE_DIR")]
    pub instance_dir: String,
}

/// diffusion 上传参数
#[derive(Args, Debug)]
pub struct DiffusionUploadArgs {
    /// Directory for storing output files
    pub output_folder: PathBuf,

    /// Name of the CIF file describing the nanoporous material structure
    #[arg(long)]
    pub framework_name: String,

    /// Source of the CIF file describing the nanoporous material structure
    #[arg(long, value_enum)]
    pub framework_source: FrameworkSource,

    /// Ingress subdomain of the materials database API
    #[arg(long, env = "INGRESS_SUBDOMAIN")]
    pub ingress_subdomain: String,
}
