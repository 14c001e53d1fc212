//! # lattice 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/lattice.rs`

use super::common::{EngineInput, LatticeInput, OrientationInput};

use clap::Args;

/// lattice 子命令参数
#[derive(Args, Debug)]
pub struct LatticeArgs {
    #[command(flatten)]
    pub lattice: LatticeInput,

    #[command(flatten)]
    pub orientation: OrientationInput,

    #[command(flatten)]
    pub engine: EngineInput,
}
