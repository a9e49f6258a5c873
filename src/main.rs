//! # Raspaflow - RASPA 吸附/扩散模拟工作流工具箱
//!
//! 将分散的 RASPA 工作流脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `prepare` - 生成 RASPA 模拟输入文件
//!   - `supercell` - P1 对称性超胞构建输入
//!   - `grid` - 能量网格预计算输入
//!   - `gcmc` - 巨正则蒙特卡洛 (GCMC) 吸附模拟输入
//!   - `md` - NVT 分子动力学扩散模拟输入
//! - `analyze` - 模拟输出后处理
//!   - `output` - RASPA 输出解析为逐周期 CSV
//!   - `equilibration` - MSER 平衡检测与统计
//!   - `diffusion` - MSD 曲线自扩散系数拟合
//! - `check` - 检查 MD 模拟是否成功结束
//! - `aggregate` - 聚合多个材料的 JSON 结果并打包
//! - `upload` - 上传物性数据到材料数据库
//! - `collect` - 从聚合压缩包提取物性表格
//! - `clean` - 清理重启前的临时目录
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (CIF / RASPA 输出解析器)
//!   │     ├── analysis/  (数值分析核心)
//!   │     └── models/    (数据模型)
//!   ├── db.rs       (材料数据库 REST 客户端)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod cli;
mod commands;
mod db;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
