//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `peaks`: 计算并显示衍射峰表，可输出图像或数据文件
//! - `lattice`: 显示实空间 / 倒空间基矢
//! - `presets`: 列出晶系预设
//! - `sweep`: 沿某一取向角扫描，逐帧输出
//! - `shell`: 行驱动的交互会话
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, peaks, lattice, sweep, shell

pub mod common;
pub mod lattice;
pub mod peaks;
pub mod shell;
pub mod sweep;

use clap::{Parser, Subcommand};

/// Ewald - GIWAXS 倒空间衍射峰计算工具
#[derive(Parser)]
#[command(name = "ewald")]
#[command(version)]
#[command(
    about = "Reciprocal-space geometry for GIWAXS: Bragg peak positions in (q_xy, q_z)",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print step-by-step debug trace to stderr
    #[arg(short, long, global = true, env = "EWALD_VERBOSE", default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compute Bragg peaks for a lattice and orientation and print the peak table
    Peaks(peaks::PeaksArgs),

    /// Show the real and reciprocal basis vectors of a lattice
    Lattice(lattice::LatticeArgs),

    /// List crystal-system presets and their constrained parameters
    Presets,

    /// Sweep one orientation angle and write one output file per step
    Sweep(sweep::SweepArgs),

    /// Interactive line-driven session (reads stdin or a script file)
    Shell(shell::ShellArgs),
}
