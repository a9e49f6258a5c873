//! # prepare 命令实现
//!
//! 生成 RASPA 模拟输入文件。每个子命令把命令行参数和从 CIF
//! 推导的自洽量（超胞重复数、分子数、网格类型）填入对应的
//! 输入文件模板。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs` 定义的参数
//! - 使用 `parsers/cif.rs`, `models/cell.rs`, `utils/files.rs`
//! - 子模块: supercell, grid, gcmc, md

pub mod gcmc;
pub mod grid;
pub mod md;
pub mod supercell;

use std::fs;
use std::path::Path;

use crate::cli::prepare::{PrepareArgs, PrepareCommands};
use crate::error::{RaspaFlowError, Result};

/// 执行 prepare 命令
pub fn execute(args: PrepareArgs) -> Result<()> {
    match args.command {
        PrepareCommands::Supercell(args) => supercell::execute(args),
        PrepareCommands::Grid(args) => grid::execute(args),
        PrepareCommands::Gcmc(args) => gcmc::execute(args),
        PrepareCommands::Md(args) => md::execute(args),
    }
}

/// 把输入文件内容写入输出目录
pub(crate) fn write_input_file(output_folder: &Path, filename: &str, content: &str) -> Result<()> {
    fs::create_dir_all(output_folder).map_err(|e| RaspaFlowError::FileWriteError {
        path: output_folder.display().to_string(),
        source: e,
    })?;

    let path = output_folder.join(filename);
    fs::write(&path, content).map_err(|e| RaspaFlowError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// yes / no 布尔关键字
pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
