//! # 衍射峰数据模型
//!
//! 定义 Miller 指数、指数范围、|G| 筛选窗口和衍射峰。
//!
//! 衍射峰是派生数据：晶格、取向或范围任一变化都会整体重新生成，
//! 从不修改已有的峰。
//!
//! ## 依赖关系
//! - 被 `geometry/enumerator.rs`、`geometry/table.rs` 使用

use crate::error::{EwaldError, Result};
use crate::geometry::vector::Vec3;

use std::f64::consts::PI;

/// Miller 指数 (h, k, l)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerIndex {
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl MillerIndex {
    pub fn new(h: i32, k: i32, l: i32) -> Self {
        MillerIndex { h, k, l }
    }

    /// 是否为 (0,0,0)（直射束，不是 Bragg 反射）
    pub fn is_origin(&self) -> bool {
        self.h == 0 && self.k == 0 && self.l == 0
    }
}

impl std::fmt::Display for MillerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.h, self.k, self.l)
    }
}

/// 单次枚举允许的最大候选指数个数（含原点）
pub const MAX_HKL_CANDIDATES: u64 = 1_000_000;

/// 对称指数范围 [-h_max..h_max] × [-k_max..k_max] × [-l_max..l_max]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HklRange {
    pub h_max: i32,
    pub k_max: i32,
    pub l_max: i32,
}

impl HklRange {
    /// 创建指数范围
    ///
    /// 任一上限为负，或候选指数总数超过 `MAX_HKL_CANDIDATES` 时返回 `InvalidRange`。
    pub fn new(h_max: i32, k_max: i32, l_max: i32) -> Result<Self> {
        for (name, value) in [("h_max", h_max), ("k_max", k_max), ("l_max", l_max)] {
            if value < 0 {
                return Err(EwaldError::InvalidRange(format!(
                    "{} = {} must be non-negative",
                    name, value
                )));
            }
        }
        let range = HklRange {
            h_max,
            k_max,
            l_max,
        };
        match range.candidate_count() {
            Some(n) if n <= MAX_HKL_CANDIDATES => Ok(range),
            _ => Err(EwaldError::InvalidRange(format!(
                "±{},±{},±{} spans more than {} indices",
                h_max, k_max, l_max, MAX_HKL_CANDIDATES
            ))),
        }
    }

    /// 盒内全部指数个数（含原点），溢出时为 None
    fn candidate_count(&self) -> Option<u64> {
        let n = |m: i32| u64::try_from(m).ok()?.checked_mul(2)?.checked_add(1);
        n(self.h_max)?
            .checked_mul(n(self.k_max)?)?
            .checked_mul(n(self.l_max)?)
    }

    /// 相同上限的立方范围
    pub fn uniform(max: i32) -> Result<Self> {
        Self::new(max, max, max)
    }

    /// 解析 "h,k,l" 或单个整数
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
        let parse_one = |s: &str| {
            s.parse::<i32>()
                .map_err(|_| EwaldError::InvalidRange(format!("'{}' is not an integer", s)))
        };

        match parts.as_slice() {
            [single] => Self::uniform(parse_one(single)?),
            [h, k, l] => Self::new(parse_one(h)?, parse_one(k)?, parse_one(l)?),
            _ => Err(EwaldError::InvalidRange(format!(
                "'{}' (expected 'h,k,l' or a single integer)",
                input
            ))),
        }
    }

    /// 范围内非零指数的个数
    pub fn peak_count(&self) -> usize {
        self.candidate_count()
            .map_or(usize::MAX, |n| usize::try_from(n - 1).unwrap_or(usize::MAX))
    }
}

impl Default for HklRange {
    fn default() -> Self {
        HklRange {
            h_max: 1,
            k_max: 1,
            l_max: 1,
        }
    }
}

impl std::fmt::Display for HklRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "±{},±{},±{}", self.h_max, self.k_max, self.l_max)
    }
}

/// |G| 筛选窗口：保留 `||G| - target| <= tolerance` 的峰
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QWindow {
    pub target: f64,
    pub tolerance: f64,
}

impl QWindow {
    pub fn new(target: f64, tolerance: f64) -> Result<Self> {
        if !target.is_finite() || target < 0.0 {
            return Err(EwaldError::InvalidArgument(format!(
                "target |G| = {} must be a non-negative number",
                target
            )));
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(EwaldError::InvalidArgument(format!(
                "tolerance = {} must be a non-negative number",
                tolerance
            )));
        }
        Ok(QWindow { target, tolerance })
    }

    pub fn contains(&self, q: f64) -> bool {
        (q - self.target).abs() <= self.tolerance
    }
}

/// 衍射峰
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Miller 指数
    pub hkl: MillerIndex,
    /// 倒格矢 G（实验室笛卡尔坐标，Å⁻¹）
    pub g: Vec3,
    /// |G|
    pub q: f64,
    /// 面内分量 hypot(G_x, G_y)，总是 ≥ 0
    pub q_xy: f64,
    /// 面外分量 G_z（带符号）
    pub q_z: f64,
}

impl Peak {
    /// 极角 χ（度）：G 与 z 轴的夹角，零向量时为 0
    pub fn chi_deg(&self) -> f64 {
        if self.q > 0.0 {
            (self.q_z / self.q).clamp(-1.0, 1.0).acos().to_degrees()
        } else {
            0.0
        }
    }

    /// 晶面间距 d = 2π/|G| (Å)
    pub fn d_spacing(&self) -> f64 {
        2.0 * PI / self.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_negative() {
        let err = HklRange::new(1, -1, 1).unwrap_err();
        assert!(matches!(err, EwaldError::InvalidRange(_)));
    }

    #[test]
    fn test_range_parse() {
        assert_eq!(HklRange::parse("2").unwrap(), HklRange::uniform(2).unwrap());
        assert_eq!(
            HklRange::parse("1, 2, 3").unwrap(),
            HklRange::new(1, 2, 3).unwrap()
        );
        assert!(HklRange::parse("1,2").is_err());
        assert!(HklRange::parse("a,b,c").is_err());
        assert!(HklRange::parse("1,-2,3").is_err());
    }

    #[test]
    fn test_range_peak_count() {
        assert_eq!(HklRange::uniform(1).unwrap().peak_count(), 26);
        assert_eq!(HklRange::new(0, 0, 2).unwrap().peak_count(), 4);
        assert_eq!(HklRange::uniform(0).unwrap().peak_count(), 0);
    }

    #[test]
    fn test_range_rejects_oversized_box() {
        let err = HklRange::new(i32::MAX, 0, 0).unwrap_err();
        assert!(matches!(err, EwaldError::InvalidRange(_)));
        assert!(matches!(
            HklRange::parse("100000"),
            Err(EwaldError::InvalidRange(_))
        ));
        assert!(HklRange::parse("2147483647").is_err());

        // 99³ = 970299 在上限内，101³ 超出
        assert_eq!(HklRange::uniform(49).unwrap().peak_count(), 970_298);
        assert!(HklRange::uniform(50).is_err());
    }

    #[test]
    fn test_q_window() {
        let w = QWindow::new(1.0, 0.1).unwrap();
        assert!(w.contains(1.05));
        assert!(w.contains(0.9));
        assert!(!w.contains(1.2));
        assert!(QWindow::new(1.0, -0.1).is_err());
    }

    #[test]
    fn test_chi_deg() {
        let peak = Peak {
            hkl: MillerIndex::new(1, 0, 1),
            g: [1.0, 0.0, 1.0],
            q: 2.0_f64.sqrt(),
            q_xy: 1.0,
            q_z: 1.0,
        };
        assert!((peak.chi_deg() - 45.0).abs() < 1e-9);
        assert!((peak.d_spacing() - 2.0 * PI / 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
