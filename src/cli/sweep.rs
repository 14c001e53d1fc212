//! # sweep 子命令 CLI 定义
//!
//! 沿一个取向角扫描，每一步是一个独立的计算，并行输出到目录。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sweep.rs`

use super::common::{EngineInput, LatticeInput, OrientationInput, OutputFormat};
use crate::models::Axis;

use clap::Args;
use std::path::PathBuf;

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub lattice: LatticeInput,

    #[command(flatten)]
    pub orientation: OrientationInput,

    #[command(flatten)]
    pub engine: EngineInput,

    /// Lab axis whose angle is swept (x = omega, y = chi, z = phi)
    #[arg(long, value_enum)]
    pub axis: Axis,

    /// First angle (degrees)
    #[arg(long, allow_hyphen_values = true)]
    pub start: f64,

    /// Last angle (degrees, included when reached exactly)
    #[arg(long, allow_hyphen_values = true)]
    pub end: f64,

    /// Angle increment (degrees, sign follows start -> end)
    #[arg(long, default_value_t = 5.0)]
    pub step: f64,

    /// Miller index range: 'h,k,l' or a single 'n'
    #[arg(long, default_value = "1,1,1")]
    pub hkl: String,

    /// Viewport 'xmin,xmax,ymin,ymax' (also fixes the plot axes)
    #[arg(long, allow_hyphen_values = true)]
    pub viewport: Option<String>,

    /// Keep only peaks with q_xy > 0 and q_z > 0
    #[arg(long, default_value_t = false)]
    pub positive: bool,

    /// Output directory
    #[arg(short, long, default_value = "sweep")]
    pub output: PathBuf,

    /// Output format for every frame
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Label plotted peaks with (hkl)
    #[arg(long, default_value_t = false)]
    pub label_peaks: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

