//! # clean 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/clean.rs`

use clap::Args;
use std::path::PathBuf;

/// clean 子命令参数
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Directory containing the simulation to be restarted
    #[arg(default_value = ".")]
    pub working_directory: PathBuf,
}
