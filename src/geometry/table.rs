//! # 衍射峰筛选与表格格式化
//!
//! 对原始峰列表应用显示策略：视窗裁剪、第一象限筛选、排序，
//! 并生成四舍五入后的表格行。
//!
//! 表格行只影响显示，`PeakTable::peaks` 中保留未取整的数值供绘图使用。
//!
//! ## 依赖关系
//! - 被 `geometry/engine.rs`、`geometry/export.rs`、`geometry/plot.rs` 使用
//! - 使用 `tabled` 输出终端表格

use crate::error::{EwaldError, Result};
use crate::models::Peak;

use clap::ValueEnum;
use serde::Serialize;
use tabled::Tabled;

/// 显示保留的小数位数
pub const DISPLAY_DECIMALS: i32 = 4;

/// (q_xy, q_z) 平面上的显示视窗，边界包含在内
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let all_finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !all_finite || x_min > x_max || y_min > y_max {
            return Err(EwaldError::InvalidArgument(format!(
                "viewport ({}, {}, {}, {}) must satisfy xmin <= xmax and ymin <= ymax",
                x_min, x_max, y_min, y_max
            )));
        }
        Ok(Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// 解析 "xmin,xmax,ymin,ymax"
    pub fn parse(input: &str) -> Result<Self> {
        let values: Vec<f64> = input
            .split(',')
            .map(|s| s.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                EwaldError::InvalidArgument(format!(
                    "viewport '{}' must be four numbers 'xmin,xmax,ymin,ymax'",
                    input
                ))
            })?;

        match values.as_slice() {
            [x0, x1, y0, y1] => Self::new(*x0, *x1, *y0, *y1),
            _ => Err(EwaldError::InvalidArgument(format!(
                "viewport '{}' must be four numbers 'xmin,xmax,ymin,ymax'",
                input
            ))),
        }
    }

    pub fn contains(&self, q_xy: f64, q_z: f64) -> bool {
        self.x_min <= q_xy && q_xy <= self.x_max && self.y_min <= q_z && q_z <= self.y_max
    }
}

/// 排序列
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    /// In-plane component
    Qxy,
    /// Out-of-plane component
    Qz,
    /// Magnitude |G|
    Q,
    H,
    K,
    L,
}

impl SortKey {
    fn compare(&self, lhs: &Peak, rhs: &Peak) -> std::cmp::Ordering {
        match self {
            SortKey::Qxy => lhs.q_xy.total_cmp(&rhs.q_xy),
            SortKey::Qz => lhs.q_z.total_cmp(&rhs.q_z),
            SortKey::Q => lhs.q.total_cmp(&rhs.q),
            SortKey::H => lhs.hkl.h.cmp(&rhs.hkl.h),
            SortKey::K => lhs.hkl.k.cmp(&rhs.hkl.k),
            SortKey::L => lhs.hkl.l.cmp(&rhs.hkl.l),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortKey::Qxy => "qxy",
            SortKey::Qz => "qz",
            SortKey::Q => "q",
            SortKey::H => "h",
            SortKey::K => "k",
            SortKey::L => "l",
        };
        write!(f, "{}", name)
    }
}

/// 筛选与排序选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub viewport: Option<Viewport>,
    /// 只保留 q_xy > 0 且 q_z > 0 的峰（叠加显示使用的第一象限）
    pub positive_only: bool,
    /// None 时保持枚举顺序
    pub sort_key: Option<SortKey>,
    pub ascending: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            viewport: None,
            positive_only: false,
            sort_key: None,
            ascending: true,
        }
    }
}

/// 表格行（显示用，q 值已取整）
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PeakRow {
    #[tabled(rename = "q_xy (Å⁻¹)")]
    pub q_xy: f64,
    #[tabled(rename = "q_z (Å⁻¹)")]
    pub q_z: f64,
    #[tabled(rename = "|q| (Å⁻¹)")]
    pub q: f64,
    #[tabled(rename = "χ (°)")]
    pub chi: f64,
    #[tabled(rename = "d (Å)")]
    pub d: f64,
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl PeakRow {
    pub fn from_peak(peak: &Peak) -> Self {
        PeakRow {
            q_xy: round_to(peak.q_xy, DISPLAY_DECIMALS),
            q_z: round_to(peak.q_z, DISPLAY_DECIMALS),
            q: round_to(peak.q, DISPLAY_DECIMALS),
            chi: round_to(peak.chi_deg(), 2),
            d: round_to(peak.d_spacing(), DISPLAY_DECIMALS),
            h: peak.hkl.h,
            k: peak.hkl.k,
            l: peak.hkl.l,
        }
    }
}

/// 筛选、排序后的峰表
#[derive(Debug, Clone, Default)]
pub struct PeakTable {
    /// 未取整的峰（绘图用），与 `rows` 一一对应
    pub peaks: Vec<Peak>,
    /// 显示行
    pub rows: Vec<PeakRow>,
}

impl PeakTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // 避免显示 -0.0000
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 对原始峰应用显示策略并生成表格
pub fn filter_and_format(peaks: &[Peak], options: &FilterOptions) -> PeakTable {
    let mut kept: Vec<Peak> = peaks
        .iter()
        .filter(|p| {
            options
                .viewport
                .map_or(true, |vp| vp.contains(p.q_xy, p.q_z))
        })
        .filter(|p| !options.positive_only || (p.q_xy > 0.0 && p.q_z > 0.0))
        .copied()
        .collect();

    if let Some(key) = options.sort_key {
        // sort_by 为稳定排序
        if options.ascending {
            kept.sort_by(|a, b| key.compare(a, b));
        } else {
            kept.sort_by(|a, b| key.compare(b, a));
        }
    }

    let rows = kept.iter().map(PeakRow::from_peak).collect();
    PeakTable { peaks: kept, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::basis::{compute_real_basis, compute_reciprocal_basis, VolumePolicy};
    use crate::geometry::enumerator::enumerate;
    use crate::models::{HklRange, LatticeParameters, MillerIndex};

    fn cubic_peaks(max: i32) -> Vec<Peak> {
        let p = LatticeParameters::new(5.0, 5.0, 5.0, 90.0, 90.0, 90.0).unwrap();
        let basis = compute_real_basis(&p, VolumePolicy::default()).unwrap();
        let recip = compute_reciprocal_basis(&basis).unwrap();
        enumerate(&recip, &HklRange::uniform(max).unwrap(), None)
    }

    fn peak(q_xy: f64, q_z: f64, h: i32) -> Peak {
        Peak {
            hkl: MillerIndex::new(h, 0, 0),
            g: [q_xy, 0.0, q_z],
            q: q_xy.hypot(q_z),
            q_xy,
            q_z,
        }
    }

    #[test]
    fn test_positive_filter_on_cubic() {
        let peaks = cubic_peaks(1);
        let table = filter_and_format(
            &peaks,
            &FilterOptions {
                positive_only: true,
                ..Default::default()
            },
        );

        // l = 1 且 (h, k) ≠ (0, 0)
        assert_eq!(table.len(), 8);
        assert!(table.peaks.iter().all(|p| p.hkl.l == 1));
        assert!(table.peaks.iter().all(|p| p.q_xy > 0.0 && p.q_z > 0.0));
    }

    #[test]
    fn test_positive_filter_keeps_one_of_each_friedel_pair() {
        let peaks = cubic_peaks(2);
        let table = filter_and_format(
            &peaks,
            &FilterOptions {
                positive_only: true,
                ..Default::default()
            },
        );

        for p in &table.peaks {
            let mate = MillerIndex::new(-p.hkl.h, -p.hkl.k, -p.hkl.l);
            assert!(!table.peaks.iter().any(|q| q.hkl == mate));
        }
        // l ∈ {1, 2}，(h, k) 取 5×5 - 1
        assert_eq!(table.len(), 2 * 24);
    }

    #[test]
    fn test_viewport_bounds_are_inclusive() {
        let peaks = vec![peak(1.0, 1.0, 1), peak(2.0, 0.5, 2), peak(0.5, 3.0, 3)];
        let vp = Viewport::new(1.0, 2.0, 0.5, 1.0).unwrap();
        let table = filter_and_format(
            &peaks,
            &FilterOptions {
                viewport: Some(vp),
                ..Default::default()
            },
        );
        let hs: Vec<i32> = table.rows.iter().map(|r| r.h).collect();
        assert_eq!(hs, vec![1, 2]);
    }

    #[test]
    fn test_sort_stable_and_descending() {
        let peaks = vec![
            peak(1.0, 2.0, 1),
            peak(0.5, 2.0, 2),
            peak(1.0, 1.0, 3),
            peak(0.5, 0.1, 4),
        ];

        let asc = filter_and_format(
            &peaks,
            &FilterOptions {
                sort_key: Some(SortKey::Qxy),
                ..Default::default()
            },
        );
        let hs: Vec<i32> = asc.rows.iter().map(|r| r.h).collect();
        assert_eq!(hs, vec![2, 4, 1, 3]);

        let desc = filter_and_format(
            &peaks,
            &FilterOptions {
                sort_key: Some(SortKey::Qxy),
                ascending: false,
                ..Default::default()
            },
        );
        let hs: Vec<i32> = desc.rows.iter().map(|r| r.h).collect();
        assert_eq!(hs, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_rows_rounded_peaks_untouched() {
        let peaks = vec![peak(1.234_567_89, 0.000_04, 1)];
        let table = filter_and_format(&peaks, &FilterOptions::default());
        assert_eq!(table.rows[0].q_xy, 1.2346);
        assert_eq!(table.rows[0].q_z, 0.0);
        assert_eq!(table.peaks[0].q_xy, 1.234_567_89);
        assert_eq!(table.peaks[0].q_z, 0.000_04);
    }

    #[test]
    fn test_viewport_parse() {
        let vp = Viewport::parse("0, 2.5, -1, 3").unwrap();
        assert_eq!(vp, Viewport::new(0.0, 2.5, -1.0, 3.0).unwrap());
        assert!(Viewport::parse("0,1,2").is_err());
        assert!(Viewport::parse("2,1,0,1").is_err());
        assert!(Viewport::parse("a,b,c,d").is_err());
    }
}
