//! # 共享参数组
//!
//! 多个子命令共用的晶格、取向与引擎参数，通过 `#[command(flatten)]` 嵌入。
//!
//! ## 依赖关系
//! - 被 `cli/` 下各子命令使用
//! - 解析结果由 `commands/mod.rs` 转为 `models/` 类型

use crate::models::{CrystalSystem, RotationMode};

use clap::{Args, ValueEnum};

// ─────────────────────────────────────────────────────────────
// 晶格参数
// ─────────────────────────────────────────────────────────────

/// 晶格参数（长度 Å，角度 °）
#[derive(Args, Debug, Clone)]
pub struct LatticeInput {
    /// Start from a crystal-system preset; explicit values override free parameters
    #[arg(long, value_enum)]
    pub system: Option<CrystalSystem>,

    /// Lattice length a (Å)
    #[arg(long)]
    pub a: Option<f64>,

    /// Lattice length b (Å)
    #[arg(long)]
    pub b: Option<f64>,

    /// Lattice length c (Å)
    #[arg(long)]
    pub c: Option<f64>,

    /// Angle alpha between b and c (degrees)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Angle beta between a and c (degrees)
    #[arg(long)]
    pub beta: Option<f64>,

    /// Angle gamma between a and b (degrees)
    #[arg(long)]
    pub gamma: Option<f64>,
}

// ─────────────────────────────────────────────────────────────
// 取向
// ─────────────────────────────────────────────────────────────

/// 样品取向（度）
#[derive(Args, Debug, Clone)]
pub struct OrientationInput {
    /// Rotation about the lab X axis (degrees), applied first
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub omega: f64,

    /// Rotation about the lab Y axis (degrees), applied second
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub chi: f64,

    /// Rotation about the lab Z axis (degrees), applied last
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub phi: f64,

    /// Rotation model
    #[arg(long, value_enum, default_value_t = RotationMode::Sequential)]
    pub mode: RotationMode,
}

// ─────────────────────────────────────────────────────────────
// 引擎配置
// ─────────────────────────────────────────────────────────────

/// 体积退化处理策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum VolumePolicyKind {
    /// Reject any non-positive c_z radicand
    Strict,
    /// Treat round-off-sized radicands as zero (fails later at V = 0)
    #[default]
    Clamp,
}

/// 引擎参数
#[derive(Args, Debug, Clone)]
pub struct EngineInput {
    /// How to treat a c_z radicand at or below zero
    #[arg(long, value_enum, default_value_t = VolumePolicyKind::Clamp)]
    pub volume_policy: VolumePolicyKind,

    /// Clamp tolerance, relative to c²
    #[arg(long, default_value_t = 1e-12)]
    pub clamp_epsilon: f64,
}

// ─────────────────────────────────────────────────────────────
// 输出格式
// ─────────────────────────────────────────────────────────────

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV table
    Csv,
    /// Commented whitespace-separated data
    Dat,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
            OutputFormat::Dat => "dat",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
