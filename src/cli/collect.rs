//! # collect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Aggregate tar archive produced by 'aggregate'
    #[arg(long)]
    pub archive: PathBuf,

    /// File listing the measured input ids, one per line
    #[arg(long)]
    pub input_ids: PathBuf,

    /// Property name, also the JSON file suffix (<material>-<property>.json)
    #[arg(long, default_value = "isotherm")]
    pub property: String,

    /// Output CSV table path
    #[arg(short, long, default_value = "properties.csv")]
    pub output: PathBuf,
}
