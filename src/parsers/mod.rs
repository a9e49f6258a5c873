//! # 解析器模块
//!
//! 提供 CIF 晶胞参数、RASPA 文本输出和 MSD 数据表格的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: cif, msd, raspa_out

pub mod cif;
pub mod msd;
pub mod raspa_out;
