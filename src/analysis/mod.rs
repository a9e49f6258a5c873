//! # 数值分析核心模块
//!
//! 扩散区间检测、MSER 平衡检测和最小二乘工具。所有函数都是
//! 输入的纯函数，无共享可变状态，可从独立调用方并发调用。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/` 使用
//! - 子模块: diffusion, equilibration, regression

pub mod diffusion;
pub mod equilibration;
pub mod regression;
