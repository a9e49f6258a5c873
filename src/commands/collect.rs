//! # collect 命令实现
//!
//! 解包 aggregate 生成的归档，按输入 id 列表逐材料读取
//! `<material>-<property>.json`，写出两列 CSV
//! (`input-id`, 属性 JSON)。工作流引擎用它发现所有已测材料的
//! 物性值。
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs::CollectArgs`
//! - 使用 `tar` 解包、`csv` 输出表格

use std::fs::{self, File};

use crate::cli::collect::CollectArgs;
use crate::error::{RaspaFlowError, Result};
use crate::utils::output;

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting Property Table");

    let archive = File::open(&args.archive).map_err(|e| RaspaFlowError::FileReadError {
        path: args.archive.display().to_string(),
        source: e,
    })?;
    tar::Archive::new(archive)
        .unpack(".")
        .map_err(|e| RaspaFlowError::FileReadError {
            path: args.archive.display().to_string(),
            source: e,
        })?;

    let ids_content =
        fs::read_to_string(&args.input_ids).map_err(|e| RaspaFlowError::FileReadError {
            path: args.input_ids.display().to_string(),
            source: e,
        })?;

    let mut writer = csv::Writer::from_path(&args.output).map_err(RaspaFlowError::CsvError)?;
    writer
        .write_record(["input-id", args.property.as_str()])
        .map_err(RaspaFlowError::CsvError)?;

    let mut count = 0;
    for input_id in ids_content.lines().filter(|line| !line.trim().is_empty()) {
        // 输入 id 形如 "<source>/<material>"
        let material = input_id.split('/').nth(1).unwrap_or(input_id);
        let json_path = format!("{}-{}.json", material, args.property);

        let content = fs::read_to_string(&json_path).map_err(|e| RaspaFlowError::FileReadError {
            path: json_path.clone(),
            source: e,
        })?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let compact = value.to_string();

        writer
            .write_record([input_id, compact.as_str()])
            .map_err(RaspaFlowError::CsvError)?;
        count += 1;
    }

    writer.flush().map_err(|e| RaspaFlowError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    output::print_done(&format!(
        "Wrote {} {} record(s) to '{}'",
        count,
        args.property,
        args.output.display()
    ));
    Ok(())
}
