//! # shell 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/shell.rs`

use super::common::{EngineInput, LatticeInput, OrientationInput};

use clap::Args;
use std::path::PathBuf;

/// shell 子命令参数
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Initial lattice (default: cubic preset)
    #[command(flatten)]
    pub lattice: LatticeInput,

    #[command(flatten)]
    pub orientation: OrientationInput,

    #[command(flatten)]
    pub engine: EngineInput,
}
