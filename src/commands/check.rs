//! # check 命令实现
//!
//! 检查 MD 模拟是否成功结束：输出文件最后一个报告块里必须出现
//! "Simulation finished"，守恒能量不得出现 NaN。失败返回错误使
//! 进程以非零码退出，工作流引擎据此触发重启。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs::CheckArgs`
//! - 使用 `parsers/raspa_out.rs`

use crate::cli::check::CheckArgs;
use crate::error::{RaspaFlowError, Result};
use crate::parsers::raspa_out;
use crate::utils::output;

/// 执行 check 命令
pub fn execute(args: CheckArgs) -> Result<()> {
    let pattern = args
        .working_directory
        .join("Output")
        .join("System_0")
        .join("output_*_0.data")
        .display()
        .to_string();

    let data_path = glob::glob(&pattern)
        .map_err(|e| RaspaFlowError::InvalidArgument(format!("Bad glob pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .next()
        .ok_or(RaspaFlowError::NoFilesFound { pattern })?;

    let parsed = raspa_out::parse_output_file(&data_path)?;
    let status = parsed.status;

    let mut errors = status.errors.clone();
    if status.nan_conserved_energy {
        errors.push("NaN values found.".to_string());
    }

    if !status.finished || status.nan_conserved_energy {
        return Err(RaspaFlowError::SimulationFailed(errors.join("\n")));
    }

    if status.warnings.is_empty() {
        output::print_success("Simulation finished successfully!");
    } else {
        output::print_warning(&format!(
            "Simulation finished with {} warnings!",
            status.warnings.len()
        ));
        for warning in &status.warnings {
            output::print_warning(warning);
        }
    }

    Ok(())
}
