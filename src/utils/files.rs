//! # 模拟文件复制工具
//!
//! 把力场定义文件和框架 CIF 文件复制到模拟输出目录，
//! RASPA 只从工作目录读取这些文件。
//!
//! ## 依赖关系
//! - 被 `commands/prepare/` 模块使用
//! - 使用 `glob` 匹配 `*.def` 文件

use std::fs;
use std::path::Path;

use crate::cli::FrameworkSource;
use crate::error::{RaspaFlowError, Result};
use crate::utils::output;

/// 复制力场 `*.def` 文件到输出目录，返回复制数量
pub fn copy_def_files(output_folder: &Path, forcefield_folder: &Path) -> Result<usize> {
    let pattern = forcefield_folder.join("*.def").display().to_string();

    let def_files: Vec<_> = glob::glob(&pattern)
        .map_err(|e| RaspaFlowError::InvalidArgument(format!("Bad glob pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .collect();

    if def_files.is_empty() {
        return Err(RaspaFlowError::NoFilesFound { pattern });
    }

    for file in &def_files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let target = output_folder.join(name);
        output::print_info(&format!("Copying {} to {}", file.display(), output_folder.display()));
        fs::copy(file, &target).map_err(|e| RaspaFlowError::FileWriteError {
            path: target.display().to_string(),
            source: e,
        })?;
    }

    Ok(def_files.len())
}

/// 复制框架 CIF 文件到输出目录
///
/// 来源为 `local` 时假定 CIF 已在输出目录中。
pub fn copy_cif_file(
    framework_folder: &Path,
    source: FrameworkSource,
    framework_name: &str,
    output_folder: &Path,
) -> Result<()> {
    if source == FrameworkSource::Local {
        output::print_info(&format!(
            "Assuming the CIF file is already inside {}",
            output_folder.display()
        ));
        return Ok(());
    }

    let cif_file = framework_folder
        .join(source.to_string())
        .join(format!("{}.cif", framework_name));

    if !cif_file.exists() {
        return Err(RaspaFlowError::FileNotFound {
            path: cif_file.display().to_string(),
        });
    }

    let target = output_folder.join(format!("{}.cif", framework_name));
    output::print_info(&format!(
        "Copying {} to {}",
        cif_file.display(),
        output_folder.display()
    ));
    fs::copy(&cif_file, &target).map_err(|e| RaspaFlowError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })?;

    Ok(())
}
