//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `geometry/`, `models/`, `batch/`, `utils/`
//! - 子模块: common, peaks, lattice, presets, sweep, shell

pub mod common;
pub mod lattice;
pub mod peaks;
pub mod presets;
pub mod shell;
pub mod sweep;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Peaks(args) => peaks::execute(args),
        Commands::Lattice(args) => lattice::execute(args),
        Commands::Presets => presets::execute(),
        Commands::Sweep(args) => sweep::execute(args),
        Commands::Shell(args) => shell::execute(args),
    }
}
