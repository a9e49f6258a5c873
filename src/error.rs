//! # 统一错误处理模块
//!
//! 定义 Raspaflow 的所有错误类型，使用 `thiserror` 派生。
//!
//! 几何与数值定义域错误（退化晶胞、非正截断半径、非正 MSD 数据）
//! 必须显式上抛，绝不允许以 NaN 静默传播。拟合质量不达标不是错误，
//! 由 `analysis::diffusion::DiffusivityEstimate::Undetermined` 表示。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Raspaflow 统一错误类型
#[derive(Error, Debug)]
pub enum RaspaFlowError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 定义域错误（晶胞几何 / MSD 数值）
    // ─────────────────────────────────────────────────────────────
    #[error("Non-physical unit cell: {reason}")]
    NonPhysicalCell { reason: String },

    #[error("Invalid cutoff radius: {value} Angstrom (must be positive)")]
    InvalidCutoff { value: f64 },

    #[error("Invalid MSD series: {reason}")]
    InvalidSeries { reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown gas component: {0}")]
    UnknownGas(String),

    // ─────────────────────────────────────────────────────────────
    // 模拟状态错误
    // ─────────────────────────────────────────────────────────────
    #[error("Simulation failed!\n{0}")]
    SimulationFailed(String),

    // ─────────────────────────────────────────────────────────────
    // 数据库 REST 调用错误
    // ─────────────────────────────────────────────────────────────
    #[error("Database request failed: {url}\nReason: {reason}")]
    RequestFailed { url: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // CSV / JSON 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RaspaFlowError>;
