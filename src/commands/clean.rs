//! # clean 命令实现
//!
//! 删除 RASPA 重启前必须清空的临时目录。缺失的目录跳过，
//! 这样同一目录可以安全地清理多次。
//!
//! ## 依赖关系
//! - 使用 `cli/clean.rs::CleanArgs`

use std::fs;

use crate::cli::clean::CleanArgs;
use crate::error::{RaspaFlowError, Result};
use crate::utils::output;

/// RASPA 在工作目录下生成的临时目录
const SCRATCH_DIRS: [&str; 6] = [
    "Restart",
    "Output",
    "CrashRestart",
    "MSDOrderN",
    "Movies",
    "VTK",
];

/// 执行 clean 命令
pub fn execute(args: CleanArgs) -> Result<()> {
    output::print_header("Cleaning Simulation Scratch Directories");

    if !args.working_directory.is_dir() {
        return Err(RaspaFlowError::DirectoryNotFound {
            path: args.working_directory.display().to_string(),
        });
    }

    for name in SCRATCH_DIRS {
        let path = args.working_directory.join(name);
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| RaspaFlowError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_info(&format!("Removed '{}'", path.display()));
        } else {
            output::print_skip(&format!("'{}' not present", path.display()));
        }
    }

    output::print_done("Working directory is ready for a restart");
    Ok(())
}
