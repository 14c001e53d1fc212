//! # 统一错误处理模块
//!
//! 定义 Ewald 的所有错误类型，使用 `thiserror` 派生。
//!
//! 几何引擎内部从不吞掉错误，也不重试：同样的输入必然得到同样的失败，
//! 由调用层决定如何呈现（打印、保留上一次结果等）。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Ewald 统一错误类型
#[derive(Error, Debug)]
pub enum EwaldError {
    // ─────────────────────────────────────────────────────────────
    // 几何错误
    // ─────────────────────────────────────────────────────────────
    #[error("Degenerate lattice: {reason}")]
    DegenerateLattice { reason: String },

    #[error("Invalid rotation axis [{}, {}, {}]: axis has zero length", axis[0], axis[1], axis[2])]
    InvalidAxis { axis: [f64; 3] },

    #[error("Invalid Miller index range: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

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

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl EwaldError {
    /// 构造退化晶格错误
    pub fn degenerate(reason: impl Into<String>) -> Self {
        EwaldError::DegenerateLattice {
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EwaldError>;
