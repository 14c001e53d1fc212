//! # peaks 子命令 CLI 定义
//!
//! 单次计算：晶格 + 取向 + hkl 范围 → 峰表，可选输出图像或数据。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/peaks.rs`

use super::common::{EngineInput, LatticeInput, OrientationInput, OutputFormat};
use crate::geometry::SortKey;

use clap::Args;
use std::path::PathBuf;

/// peaks 子命令参数
#[derive(Args, Debug)]
pub struct PeaksArgs {
    #[command(flatten)]
    pub lattice: LatticeInput,

    #[command(flatten)]
    pub orientation: OrientationInput,

    #[command(flatten)]
    pub engine: EngineInput,

    // ─────────────────────────────────────────────────────────────
    // 枚举范围
    // ─────────────────────────────────────────────────────────────
    /// Miller index range: 'h,k,l' or a single 'n' for all three
    #[arg(long, default_value = "1,1,1")]
    pub hkl: String,

    /// Keep only peaks with | |q| - target | <= tol (1/Å)
    #[arg(long, requires = "tol")]
    pub target_q: Option<f64>,

    /// Tolerance for --target-q (1/Å)
    #[arg(long, requires = "target_q")]
    pub tol: Option<f64>,

    // ─────────────────────────────────────────────────────────────
    // 显示策略
    // ─────────────────────────────────────────────────────────────
    /// Viewport 'xmin,xmax,ymin,ymax' in (q_xy, q_z); bounds inclusive
    #[arg(long, allow_hyphen_values = true)]
    pub viewport: Option<String>,

    /// Keep only peaks with q_xy > 0 and q_z > 0
    #[arg(long, default_value_t = false)]
    pub positive: bool,

    /// Sort column (default: enumeration order)
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, default_value_t = false, requires = "sort")]
    pub desc: bool,

    /// Print at most this many rows (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    // ─────────────────────────────────────────────────────────────
    // 输出
    // ─────────────────────────────────────────────────────────────
    /// Output file (format inferred from extension unless --format is given)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Label plotted peaks with (hkl)
    #[arg(long, default_value_t = false)]
    pub label_peaks: bool,

    /// Plot title (default: lattice summary)
    #[arg(long)]
    pub title: Option<String>,
}
