//! # 衍射峰枚举
//!
//! 遍历 (h, k, l) 指数盒，计算 `G = h·a* + k·b* + l·c*` 并分解为
//! 面内 / 面外分量。
//!
//! ## q 分解约定
//! - `q_xy = hypot(G_x, G_y)`，总是 ≥ 0
//! - `q_z = G_z`，带符号
//!
//! 这是唯一的分解方式。极角 χ 只作为派生列从 (q_z, |G|) 求出，
//! 不会反过来用于计算 q_xy / q_z。
//!
//! ## 依赖关系
//! - 被 `geometry/engine.rs` 调用
//! - 使用 `models/peak.rs` 的数据结构

use crate::geometry::vector::{norm, Vec3};
use crate::models::peak::MAX_HKL_CANDIDATES;
use crate::models::{HklRange, MillerIndex, Peak, QWindow, ReciprocalBasis};

/// 计算倒格矢 G
pub fn reciprocal_vector(recip: &ReciprocalBasis, hkl: MillerIndex) -> Vec3 {
    let (h, k, l) = (hkl.h as f64, hkl.k as f64, hkl.l as f64);
    [
        h * recip.a_star[0] + k * recip.b_star[0] + l * recip.c_star[0],
        h * recip.a_star[1] + k * recip.b_star[1] + l * recip.c_star[1],
        h * recip.a_star[2] + k * recip.b_star[2] + l * recip.c_star[2],
    ]
}

/// 由 Miller 指数构造衍射峰
pub fn peak_at(recip: &ReciprocalBasis, hkl: MillerIndex) -> Peak {
    let g = reciprocal_vector(recip, hkl);
    Peak {
        hkl,
        g,
        q: norm(&g),
        q_xy: g[0].hypot(g[1]),
        q_z: g[2],
    }
}

/// 枚举指数盒内的全部衍射峰
///
/// 顺序为 h 最外层、l 最内层的嵌套遍历；(0,0,0) 总是被排除。
/// 给定 `window` 时只保留 |G| 落在窗口内的峰。
pub fn enumerate(recip: &ReciprocalBasis, range: &HklRange, window: Option<&QWindow>) -> Vec<Peak> {
    let capacity = range.peak_count().min(MAX_HKL_CANDIDATES as usize);
    let mut peaks = Vec::with_capacity(capacity);

    for h in -range.h_max..=range.h_max {
        for k in -range.k_max..=range.k_max {
            for l in -range.l_max..=range.l_max {
                let hkl = MillerIndex::new(h, k, l);
                if hkl.is_origin() {
                    continue;
                }

                let peak = peak_at(recip, hkl);

                if let Some(w) = window {
                    if !w.contains(peak.q) {
                        continue;
                    }
                }

                peaks.push(peak);
            }
        }
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::basis::{compute_real_basis, compute_reciprocal_basis, VolumePolicy};
    use crate::models::LatticeParameters;

    use std::f64::consts::PI;

    fn cubic_recip(a: f64) -> ReciprocalBasis {
        let p = LatticeParameters::new(a, a, a, 90.0, 90.0, 90.0).unwrap();
        let basis = compute_real_basis(&p, VolumePolicy::default()).unwrap();
        compute_reciprocal_basis(&basis).unwrap()
    }

    #[test]
    fn test_cubic_unit_box_has_26_peaks() {
        let peaks = enumerate(&cubic_recip(5.0), &HklRange::uniform(1).unwrap(), None);
        assert_eq!(peaks.len(), 26);
        assert!(peaks.iter().all(|p| !p.hkl.is_origin()));
    }

    #[test]
    fn test_enumeration_order() {
        let peaks = enumerate(&cubic_recip(5.0), &HklRange::uniform(1).unwrap(), None);
        assert_eq!(peaks[0].hkl, MillerIndex::new(-1, -1, -1));
        assert_eq!(peaks[1].hkl, MillerIndex::new(-1, -1, 0));
        assert_eq!(peaks[2].hkl, MillerIndex::new(-1, -1, 1));
        assert_eq!(peaks[3].hkl, MillerIndex::new(-1, 0, -1));
        assert_eq!(peaks[25].hkl, MillerIndex::new(1, 1, 1));
    }

    #[test]
    fn test_cubic_axis_peaks() {
        let recip = cubic_recip(5.0);
        let expected = 2.0 * PI / 5.0;

        let p100 = peak_at(&recip, MillerIndex::new(1, 0, 0));
        assert!((p100.q_xy - expected).abs() < 1e-12);
        assert!(p100.q_z.abs() < 1e-12);

        let p001 = peak_at(&recip, MillerIndex::new(0, 0, 1));
        assert!(p001.q_xy.abs() < 1e-12);
        assert!((p001.q_z - expected).abs() < 1e-12);
        assert!(p001.chi_deg().abs() < 1e-9);
    }

    #[test]
    fn test_cartesian_split_consistent_with_polar_angle() {
        let p = LatticeParameters::new(5.1, 6.3, 7.2, 80.0, 95.0, 110.0).unwrap();
        let basis = compute_real_basis(&p, VolumePolicy::default()).unwrap();
        let recip = compute_reciprocal_basis(&basis).unwrap();

        for peak in enumerate(&recip, &HklRange::uniform(2).unwrap(), None) {
            let chi = peak.chi_deg().to_radians();
            assert!((peak.q * chi.sin() - peak.q_xy).abs() < 1e-9);
            assert!((peak.q * chi.cos() - peak.q_z).abs() < 1e-9);
            assert!(peak.q_xy >= 0.0);
        }
    }

    #[test]
    fn test_target_window() {
        let recip = cubic_recip(5.0);
        let q100 = 2.0 * PI / 5.0;
        let window = QWindow::new(q100, 1e-6).unwrap();
        let peaks = enumerate(&recip, &HklRange::uniform(2).unwrap(), Some(&window));

        // {100} 族共 6 个
        assert_eq!(peaks.len(), 6);
        assert!(peaks.iter().all(|p| (p.q - q100).abs() <= 1e-6));
    }

    #[test]
    fn test_very_large_cell_keeps_all_peaks() {
        // a = 1e11 Å：|G| ≈ 6e-11 Å⁻¹，仍是有效的非零反射
        let peaks = enumerate(&cubic_recip(1e11), &HklRange::uniform(1).unwrap(), None);
        assert_eq!(peaks.len(), 26);
        assert!(peaks.iter().all(|p| p.q > 0.0));
    }

    #[test]
    fn test_zero_range_is_empty() {
        let peaks = enumerate(&cubic_recip(5.0), &HklRange::uniform(0).unwrap(), None);
        assert!(peaks.is_empty());
    }
}
