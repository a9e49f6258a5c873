//! # aggregate 命令实现
//!
//! 把多个输出目录中的 `isotherm.json` / `diffusion.json` 复制到
//! 当前目录（改名为 `<framework>-<kind>.json`），再把当前目录中的
//! 全部 JSON 文件打进一个 tar 包。
//!
//! 归档不压缩但沿用 `.tgz` 扩展名，与下游工具的命名约定一致。
//!
//! ## 依赖关系
//! - 使用 `cli/aggregate.rs` 定义的参数
//! - 使用 `tar` 打包、`utils/progress.rs` 显示进度

use std::fs::{self, File};
use std::path::Path;

use crate::cli::aggregate::{AggregateArgs, AggregateCommands, AggregateKindArgs};
use crate::error::{RaspaFlowError, Result};
use crate::utils::{output, progress};

/// 执行 aggregate 命令
pub fn execute(args: AggregateArgs) -> Result<()> {
    match args.command {
        AggregateCommands::Isotherm(args) => run(args, "isotherm", "isotherms.tgz"),
        AggregateCommands::Diffusion(args) => run(args, "diffusion", "diffusion.tgz"),
    }
}

fn run(args: AggregateKindArgs, kind: &str, archive_name: &str) -> Result<()> {
    output::print_header(&format!("Aggregating {} results", kind));

    if args.framework_name.len() != args.output_folders.len() {
        return Err(RaspaFlowError::InvalidArgument(format!(
            "Got {} framework names but {} output folders",
            args.framework_name.len(),
            args.output_folders.len()
        )));
    }

    let pb = progress::create_progress_bar(args.output_folders.len() as u64, "Collecting");

    for (name, folder) in args.framework_name.iter().zip(args.output_folders.iter()) {
        let source = folder.join(format!("{}.json", kind));
        let target = format!("{}-{}.json", name, kind);

        fs::copy(&source, &target).map_err(|e| RaspaFlowError::FileReadError {
            path: source.display().to_string(),
            source: e,
        })?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let count = build_archive(Path::new(archive_name))?;
    output::print_done(&format!(
        "Bundled {} JSON file(s) into '{}'",
        count, archive_name
    ));
    Ok(())
}

/// 把当前目录中的所有 JSON 文件打进 tar 包，返回文件数量
fn build_archive(archive_path: &Path) -> Result<usize> {
    let file = File::create(archive_path).map_err(|e| RaspaFlowError::FileWriteError {
        path: archive_path.display().to_string(),
        source: e,
    })?;
    let mut builder = tar::Builder::new(file);

    let mut count = 0;
    let entries = fs::read_dir(".").map_err(|e| RaspaFlowError::FileReadError {
        path: ".".to_string(),
        source: e,
    })?;

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            builder
                .append_path_with_name(&path, entry.file_name())
                .map_err(|e| RaspaFlowError::FileWriteError {
                    path: path.display().to_string(),
                    source: e,
                })?;
            count += 1;
        }
    }

    builder
        .finish()
        .map_err(|e| RaspaFlowError::FileWriteError {
            path: archive_path.display().to_string(),
            source: e,
        })?;

    Ok(count)
}
