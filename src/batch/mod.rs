//! # 批量处理模块
//!
//! 并行计算一组相互独立的任务（如角度扫描的每一帧）。
//!
//! ## 功能
//! - 并行处理
//! - 进度反馈与统计
//! - 失败不中断，汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::{BatchResult, BatchRunner, ProcessResult};
