//! # 衍射峰叠加图
//!
//! 使用 `plotters` 在 (q_xy, q_z) 平面上绘制衍射峰位置。
//!
//! ## 功能
//! - 空心红圈标记峰位
//! - 可选 hkl 标注
//! - 有视窗时以视窗为坐标范围，否则自动缩放到全部峰
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/peaks.rs` 和 `commands/sweep.rs` 调用
//! - 使用 `geometry/table.rs` 的 PeakTable, Viewport
//! - 使用 `plotters` 渲染图表

use crate::error::{EwaldError, Result};
use crate::geometry::table::{PeakTable, Viewport};

use plotters::prelude::*;
use std::path::Path;

/// 绘图选项
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub label_peaks: bool,
    pub viewport: Option<Viewport>,
    pub use_svg: bool,
}

/// 生成衍射峰叠加图
pub fn generate_peak_plot(table: &PeakTable, output_path: &Path, options: &PlotOptions) -> Result<()> {
    if options.use_svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_peak_chart(&root, table, options)?;
        root.present()
            .map_err(|e| EwaldError::PlotError(e.to_string()))?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_peak_chart(&root, table, options)?;
        root.present()
            .map_err(|e| EwaldError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 坐标范围：视窗优先，其次自动缩放
pub fn plot_extent(table: &PeakTable, viewport: Option<&Viewport>) -> (f64, f64, f64, f64) {
    if let Some(vp) = viewport {
        return (vp.x_min, vp.x_max, vp.y_min, vp.y_max);
    }

    if table.peaks.is_empty() {
        return (0.0, 3.0, 0.0, 3.0);
    }

    let fold = |f: fn(&crate::models::Peak) -> f64| {
        table
            .peaks
            .iter()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    };
    let (_, x_hi) = fold(|p| p.q_xy);
    let (y_lo, y_hi) = fold(|p| p.q_z);

    // 与叠加显示一致：从 0 开始，上限留 10% 余量
    let x_max = if x_hi > 0.0 { x_hi * 1.1 } else { 1.0 };
    let y_min = if y_lo < 0.0 { y_lo * 1.1 } else { 0.0 };
    let y_max = if y_hi > 0.0 { y_hi * 1.1 } else { 1.0 };
    (0.0, x_max, y_min, y_max)
}

/// 绘图核心逻辑
fn draw_peak_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    table: &PeakTable,
    options: &PlotOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EwaldError::PlotError(format!("{:?}", e)))?;

    let (x_min, x_max, y_min, y_max) = plot_extent(table, options.viewport.as_ref());
    // 零宽视窗无法建立坐标系
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };
    let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| EwaldError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("q_xy (Å⁻¹)")
        .y_desc("q_z (Å⁻¹)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EwaldError::PlotError(format!("{:?}", e)))?;

    let in_view = |q_xy: f64, q_z: f64| {
        (x_min..=x_max).contains(&q_xy) && (y_min..=y_max).contains(&q_z)
    };

    chart
        .draw_series(
            table
                .peaks
                .iter()
                .filter(|p| in_view(p.q_xy, p.q_z))
                .map(|p| Circle::new((p.q_xy, p.q_z), 6, RED.stroke_width(2))),
        )
        .map_err(|e| EwaldError::PlotError(format!("{:?}", e)))?;

    if options.label_peaks {
        let dy = (y_max - y_min) * 0.02;
        let text_style = ("sans-serif", 12).into_font().color(&BLACK);

        chart
            .draw_series(
                table
                    .peaks
                    .iter()
                    .filter(|p| in_view(p.q_xy, p.q_z))
                    .map(|p| {
                        Text::new(
                            format!("{}{}{}", p.hkl.h, p.hkl.k, p.hkl.l),
                            (p.q_xy, p.q_z + dy),
                            text_style.clone(),
                        )
                    }),
            )
            .map_err(|e| EwaldError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MillerIndex, Peak};

    fn table(points: &[(f64, f64)]) -> PeakTable {
        let peaks = points
            .iter()
            .map(|&(q_xy, q_z)| Peak {
                hkl: MillerIndex::new(1, 0, 0),
                g: [q_xy, 0.0, q_z],
                q: q_xy.hypot(q_z),
                q_xy,
                q_z,
            })
            .collect();
        PeakTable {
            peaks,
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_extent_autoscale() {
        let (x0, x1, y0, y1) = plot_extent(&table(&[(1.0, 2.0), (2.0, 1.0)]), None);
        assert_eq!(x0, 0.0);
        assert!((x1 - 2.2).abs() < 1e-12);
        assert_eq!(y0, 0.0);
        assert!((y1 - 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_extent_includes_negative_qz() {
        let (_, _, y0, _) = plot_extent(&table(&[(1.0, -2.0), (2.0, 1.0)]), None);
        assert!((y0 + 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_extent_prefers_viewport() {
        let vp = Viewport::new(0.5, 1.5, -1.0, 1.0).unwrap();
        let extent = plot_extent(&table(&[(1.0, 2.0)]), Some(&vp));
        assert_eq!(extent, (0.5, 1.5, -1.0, 1.0));
    }
}
