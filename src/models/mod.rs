//! # 数据模型模块
//!
//! 定义晶胞几何、气体组分和热力学性质文档的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: cell, gas, thermo

pub mod cell;
pub mod gas;
pub mod thermo;

pub use cell::{Replication, UnitCell};
pub use gas::{Composition, Gas};
pub use thermo::{ComponentFraction, DiffusionRecord, IsothermPoint, Measurement, ThermoProperty};
