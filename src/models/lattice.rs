//! # 晶格数据模型
//!
//! 定义晶格参数、晶系预设以及实空间 / 倒空间基矢。
//!
//! 晶格参数是不可变值；基矢总是由参数从头重新计算，从不原地修改。
//!
//! ## 依赖关系
//! - 被 `geometry/` 和 `commands/` 使用
//! - 使用 `geometry/vector.rs` 的三角函数工具

use crate::error::{EwaldError, Result};
use crate::geometry::vector::{sin_cos_deg, Vec3};

use clap::ValueEnum;

/// 晶格参数 (a, b, c, α, β, γ)
///
/// 长度单位 Å，角度单位度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl LatticeParameters {
    /// 创建并校验晶格参数
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        let params = LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        };
        params.validate()?;
        Ok(params)
    }

    /// 校验长度为正、角度严格位于 (0°, 180°)
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("a", self.a), ("b", self.b), ("c", self.c)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EwaldError::degenerate(format!(
                    "length {} = {} must be a positive number",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || value <= 0.0 || value >= 180.0 {
                return Err(EwaldError::degenerate(format!(
                    "angle {} = {}° must lie strictly between 0° and 180°",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// 体积公式中根号下的量
    ///
    /// `1 - cos²α - cos²β - cos²γ + 2·cosα·cosβ·cosγ`
    pub fn volume_radicand(&self) -> f64 {
        let (_, ca) = sin_cos_deg(self.alpha);
        let (_, cb) = sin_cos_deg(self.beta);
        let (_, cg) = sin_cos_deg(self.gamma);
        1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg
    }

    /// 由显式公式计算晶胞体积 (Å³)
    ///
    /// `V = a·b·c·√(radicand)`，radicand 非正时返回 `DegenerateLattice`。
    pub fn volume(&self) -> Result<f64> {
        self.validate()?;
        let radicand = self.volume_radicand();
        if radicand <= 0.0 {
            return Err(EwaldError::degenerate(format!(
                "angles ({}°, {}°, {}°) give a non-positive cell volume (radicand = {:.3e})",
                self.alpha, self.beta, self.gamma, radicand
            )));
        }
        Ok(self.a * self.b * self.c * radicand.sqrt())
    }
}

impl std::fmt::Display for LatticeParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "a={:.4} b={:.4} c={:.4} α={:.2}° β={:.2}° γ={:.2}°",
            self.a, self.b, self.c, self.alpha, self.beta, self.gamma
        )
    }
}

// ─────────────────────────────────────────────────────────────
// 晶系预设
// ─────────────────────────────────────────────────────────────

/// 晶系
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CrystalSystem {
    /// No constraints
    Triclinic,
    /// alpha = gamma = 90°
    Monoclinic,
    /// All angles 90°
    Orthorhombic,
    /// a = b, all angles 90°
    Tetragonal,
    /// Rhombohedral setting: a = b = c, alpha = beta = gamma
    Trigonal,
    /// a = b, alpha = beta = 90°, gamma = 120°
    Hexagonal,
    /// a = b = c, all angles 90°
    Cubic,
}

impl CrystalSystem {
    /// 全部晶系（用于列表输出）
    pub const ALL: [CrystalSystem; 7] = [
        CrystalSystem::Triclinic,
        CrystalSystem::Monoclinic,
        CrystalSystem::Orthorhombic,
        CrystalSystem::Tetragonal,
        CrystalSystem::Trigonal,
        CrystalSystem::Hexagonal,
        CrystalSystem::Cubic,
    ];

    /// 预设晶格参数
    pub fn preset(&self) -> LatticeParameters {
        let (a, b, c, alpha, beta, gamma) = match self {
            CrystalSystem::Triclinic => (1.0, 1.2, 1.3, 100.0, 110.0, 120.0),
            CrystalSystem::Monoclinic => (1.0, 1.1, 1.3, 90.0, 110.0, 90.0),
            CrystalSystem::Orthorhombic => (1.0, 1.2, 1.3, 90.0, 90.0, 90.0),
            CrystalSystem::Tetragonal => (1.0, 1.0, 1.2, 90.0, 90.0, 90.0),
            CrystalSystem::Trigonal => (1.0, 1.0, 1.0, 60.0, 60.0, 60.0),
            CrystalSystem::Hexagonal => (1.0, 1.0, 1.5, 90.0, 90.0, 120.0),
            CrystalSystem::Cubic => (1.0, 1.0, 1.0, 90.0, 90.0, 90.0),
        };
        LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// 由晶系对称性决定的参数（不可自由编辑）
    pub fn dependent_fields(&self) -> &'static [&'static str] {
        match self {
            CrystalSystem::Triclinic => &[],
            CrystalSystem::Monoclinic => &["alpha", "gamma"],
            CrystalSystem::Orthorhombic => &["alpha", "beta", "gamma"],
            CrystalSystem::Tetragonal => &["b", "alpha", "beta", "gamma"],
            CrystalSystem::Trigonal => &["b", "c", "beta", "gamma"],
            CrystalSystem::Hexagonal => &["b", "alpha", "beta", "gamma"],
            CrystalSystem::Cubic => &["b", "c", "alpha", "beta", "gamma"],
        }
    }

    /// 按晶系约束覆盖依赖参数
    pub fn constrain(&self, p: LatticeParameters) -> LatticeParameters {
        match self {
            CrystalSystem::Triclinic => p,
            CrystalSystem::Monoclinic => LatticeParameters {
                alpha: 90.0,
                gamma: 90.0,
                ..p
            },
            CrystalSystem::Orthorhombic => LatticeParameters {
                alpha: 90.0,
                beta: 90.0,
                gamma: 90.0,
                ..p
            },
            CrystalSystem::Tetragonal => LatticeParameters {
                b: p.a,
                alpha: 90.0,
                beta: 90.0,
                gamma: 90.0,
                ..p
            },
            CrystalSystem::Trigonal => LatticeParameters {
                b: p.a,
                c: p.a,
                beta: p.alpha,
                gamma: p.alpha,
                ..p
            },
            CrystalSystem::Hexagonal => LatticeParameters {
                b: p.a,
                alpha: 90.0,
                beta: 90.0,
                gamma: 120.0,
                ..p
            },
            CrystalSystem::Cubic => LatticeParameters {
                b: p.a,
                c: p.a,
                alpha: 90.0,
                beta: 90.0,
                gamma: 90.0,
                ..p
            },
        }
    }
}

impl std::fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CrystalSystem::Triclinic => "triclinic",
            CrystalSystem::Monoclinic => "monoclinic",
            CrystalSystem::Orthorhombic => "orthorhombic",
            CrystalSystem::Tetragonal => "tetragonal",
            CrystalSystem::Trigonal => "trigonal",
            CrystalSystem::Hexagonal => "hexagonal",
            CrystalSystem::Cubic => "cubic",
        };
        write!(f, "{}", name)
    }
}

// ─────────────────────────────────────────────────────────────
// 基矢
// ─────────────────────────────────────────────────────────────

/// 实空间基矢 (a, b, c)，笛卡尔坐标，单位 Å
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealBasis {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl RealBasis {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        RealBasis { a, b, c }
    }

    /// 以行向量形式返回 [a, b, c]
    pub fn rows(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// 由行向量矩阵创建
    pub fn from_rows(rows: [Vec3; 3]) -> Self {
        RealBasis {
            a: rows[0],
            b: rows[1],
            c: rows[2],
        }
    }
}

/// 倒空间基矢 (a*, b*, c*)，包含 2π 因子，单位 Å⁻¹
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReciprocalBasis {
    pub a_star: Vec3,
    pub b_star: Vec3,
    pub c_star: Vec3,
}
