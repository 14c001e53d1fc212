//! # 晶格基矢计算
//!
//! 由晶格参数构造实空间基矢，再由实空间基矢计算倒空间基矢。
//!
//! ## 约定
//! - a 沿 x 轴
//! - b 位于 xy 平面
//! - c 补全右手系，c_z 由闭式 `√(c² - c_x² - c_y²)` 给出
//!
//! c_z 的闭式解与显式体积公式 `c_z = V / (a·b·sinγ)` 代数等价，
//! 两者的一致性由测试保证。
//!
//! ## 依赖关系
//! - 被 `geometry/engine.rs` 和 `commands/lattice.rs` 调用
//! - 使用 `models/lattice.rs` 的数据结构

use crate::error::{EwaldError, Result};
use crate::geometry::vector::{cross, dot, norm, scale, sin_cos_deg};
use crate::models::{LatticeParameters, RealBasis, ReciprocalBasis};

use std::f64::consts::PI;

/// sinγ 低于该值视为 γ = 0° 或 180°
const SIN_GAMMA_EPS: f64 = 1e-12;

/// |V| 相对 |a||b||c| 低于该值视为退化
const RELATIVE_VOLUME_EPS: f64 = 1e-12;

/// c_z² 为负时的处理策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumePolicy {
    /// c_z² ≤ 0 即判定为退化晶格
    Strict,
    /// |c_z²| ≤ epsilon·c² 视为浮点噪声并截断为 0，更负的值判定为退化
    Clamp { epsilon: f64 },
}

impl Default for VolumePolicy {
    fn default() -> Self {
        VolumePolicy::Clamp { epsilon: 1e-12 }
    }
}

/// 由晶格参数计算实空间基矢
pub fn compute_real_basis(params: &LatticeParameters, policy: VolumePolicy) -> Result<RealBasis> {
    params.validate()?;

    let LatticeParameters { a, b, c, .. } = *params;
    let (_, cos_alpha) = sin_cos_deg(params.alpha);
    let (_, cos_beta) = sin_cos_deg(params.beta);
    let (sin_gamma, cos_gamma) = sin_cos_deg(params.gamma);

    if sin_gamma.abs() < SIN_GAMMA_EPS {
        return Err(EwaldError::degenerate(format!(
            "gamma = {}° makes a and b collinear",
            params.gamma
        )));
    }

    let a_vec = [a, 0.0, 0.0];
    let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

    let c_x = c * cos_beta;
    let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
    let c_z_sq = c * c - c_x * c_x - c_y * c_y;

    let c_z = match policy {
        VolumePolicy::Strict if c_z_sq <= 0.0 => {
            return Err(EwaldError::degenerate(format!(
                "angles ({}°, {}°, {}°) give a non-positive cell volume",
                params.alpha, params.beta, params.gamma
            )));
        }
        VolumePolicy::Clamp { epsilon } if c_z_sq < -epsilon * c * c => {
            return Err(EwaldError::degenerate(format!(
                "angles ({}°, {}°, {}°) give a negative volume radicand (c_z² = {:.3e})",
                params.alpha, params.beta, params.gamma, c_z_sq
            )));
        }
        VolumePolicy::Clamp { epsilon } if c_z_sq <= epsilon * c * c => 0.0,
        _ => c_z_sq.sqrt(),
    };

    Ok(RealBasis::new(a_vec, b_vec, [c_x, c_y, c_z]))
}

/// 由实空间基矢计算倒空间基矢
///
/// `a* = 2π (b × c) / V`，b*、c* 依次轮换，`V = a · (b × c)`。
pub fn compute_reciprocal_basis(basis: &RealBasis) -> Result<ReciprocalBasis> {
    let volume = cell_volume(basis);
    let scale_ref = norm(&basis.a) * norm(&basis.b) * norm(&basis.c);

    if !volume.is_finite() || volume.abs() <= RELATIVE_VOLUME_EPS * scale_ref {
        return Err(EwaldError::degenerate(format!(
            "basis vectors are coplanar (V = {:.3e})",
            volume
        )));
    }

    let factor = 2.0 * PI / volume;

    Ok(ReciprocalBasis {
        a_star: scale(&cross(&basis.b, &basis.c), factor),
        b_star: scale(&cross(&basis.c, &basis.a), factor),
        c_star: scale(&cross(&basis.a, &basis.b), factor),
    })
}

/// 带符号的晶胞体积 a · (b × c)
pub fn cell_volume(basis: &RealBasis) -> f64 {
    dot(&basis.a, &cross(&basis.b, &basis.c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> LatticeParameters {
        LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// c_z 的显式体积公式
    fn c_z_from_volume(p: &LatticeParameters) -> f64 {
        let (sin_gamma, _) = sin_cos_deg(p.gamma);
        p.volume().unwrap() / (p.a * p.b * sin_gamma)
    }

    #[test]
    fn test_cubic_real_basis() {
        let basis = compute_real_basis(
            &params(5.0, 5.0, 5.0, 90.0, 90.0, 90.0),
            VolumePolicy::Strict,
        )
        .unwrap();
        assert_eq!(basis.a, [5.0, 0.0, 0.0]);
        assert_eq!(basis.b, [0.0, 5.0, 0.0]);
        assert_eq!(basis.c, [0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_c_z_formulas_agree() {
        let cells = [
            params(5.0, 5.0, 5.0, 90.0, 90.0, 90.0),
            params(3.0, 3.0, 5.0, 90.0, 90.0, 120.0),
            params(5.1, 6.3, 7.2, 80.0, 95.0, 110.0),
            params(1.0, 1.1, 1.3, 90.0, 110.0, 90.0),
            params(1.0, 1.0, 1.0, 60.0, 60.0, 60.0),
            params(4.2, 8.9, 3.3, 101.5, 77.3, 64.1),
        ];

        for p in cells {
            let basis = compute_real_basis(&p, VolumePolicy::Strict).unwrap();
            let closed = basis.c[2];
            let explicit = c_z_from_volume(&p);
            let rel = (closed - explicit).abs() / explicit.abs();
            assert!(rel < 1e-9, "{:?}: {} vs {}", p, closed, explicit);

            // 基矢体积与显式体积公式一致
            let v = cell_volume(&basis);
            assert!((v - p.volume().unwrap()).abs() / v < 1e-9);
        }
    }

    #[test]
    fn test_real_basis_preserves_lengths_and_angles() {
        let p = params(5.1, 6.3, 7.2, 80.0, 95.0, 110.0);
        let basis = compute_real_basis(&p, VolumePolicy::default()).unwrap();

        assert!((norm(&basis.c) - 7.2).abs() < 1e-9);
        let cos_alpha = dot(&basis.b, &basis.c) / (6.3 * 7.2);
        assert!((cos_alpha.acos().to_degrees() - 80.0).abs() < 1e-9);
        let cos_beta = dot(&basis.a, &basis.c) / (5.1 * 7.2);
        assert!((cos_beta.acos().to_degrees() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_gamma() {
        for gamma in [0.0, 180.0] {
            let err = compute_real_basis(&params(5.0, 5.0, 5.0, 90.0, 90.0, gamma), VolumePolicy::Strict)
                .unwrap_err();
            assert!(matches!(err, EwaldError::DegenerateLattice { .. }));
        }
    }

    #[test]
    fn test_policy_on_negative_radicand() {
        let impossible = params(1.0, 1.0, 1.0, 30.0, 30.0, 120.0);
        assert!(compute_real_basis(&impossible, VolumePolicy::Strict).is_err());
        assert!(compute_real_basis(&impossible, VolumePolicy::default()).is_err());
    }

    #[test]
    fn test_clamp_then_reciprocal_fails() {
        // α = β + γ 时晶胞恰好压平：c_z² 只剩浮点噪声
        let flat = params(1.0, 1.0, 1.0, 100.0, 40.0, 60.0);
        let clamped = compute_real_basis(&flat, VolumePolicy::Clamp { epsilon: 1e-9 }).unwrap();
        assert_eq!(clamped.c[2], 0.0);
        let err = compute_reciprocal_basis(&clamped).unwrap_err();
        assert!(matches!(err, EwaldError::DegenerateLattice { .. }));
    }

    #[test]
    fn test_cubic_reciprocal_basis() {
        let basis = compute_real_basis(
            &params(5.0, 5.0, 5.0, 90.0, 90.0, 90.0),
            VolumePolicy::default(),
        )
        .unwrap();
        let recip = compute_reciprocal_basis(&basis).unwrap();
        let expected = 2.0 * PI / 5.0;

        for v in [recip.a_star, recip.b_star, recip.c_star] {
            assert!((norm(&v) - expected).abs() < 1e-12);
        }
        assert!(dot(&recip.a_star, &recip.b_star).abs() < 1e-12);
        assert!(dot(&recip.b_star, &recip.c_star).abs() < 1e-12);
        assert!(dot(&recip.c_star, &recip.a_star).abs() < 1e-12);
    }

    #[test]
    fn test_reciprocal_duality() {
        // a_i · b_j = 2π δ_ij
        let basis = compute_real_basis(
            &params(5.1, 6.3, 7.2, 80.0, 95.0, 110.0),
            VolumePolicy::default(),
        )
        .unwrap();
        let recip = compute_reciprocal_basis(&basis).unwrap();
        let real = basis.rows();
        let stars = [recip.a_star, recip.b_star, recip.c_star];

        for (i, r) in real.iter().enumerate() {
            for (j, s) in stars.iter().enumerate() {
                let expected = if i == j { 2.0 * PI } else { 0.0 };
                assert!((dot(r, s) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_reciprocal_rejects_coplanar_basis() {
        let basis = RealBasis::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        assert!(compute_reciprocal_basis(&basis).is_err());
    }
}
