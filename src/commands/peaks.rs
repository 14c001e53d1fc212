//! # peaks 子命令实现
//!
//! 单次计算衍射峰并打印峰表。
//!
//! ## 流程
//! 1. 解析晶格、取向、范围与显示策略
//! 2. 引擎计算全部峰
//! 3. 应用视窗 / 第一象限 / 排序，打印表格
//! 4. 可选写出 PNG/SVG/CSV/DAT
//!
//! ## 依赖关系
//! - 使用 `cli/peaks.rs` 定义的 PeaksArgs
//! - 使用 `geometry/` 进行计算和输出

use super::common::{
    engine_config, guess_format_from_extension, parse_viewport, print_peak_table,
    resolve_lattice, resolve_orientation, write_output,
};
use crate::cli::peaks::PeaksArgs;
use crate::error::Result;
use crate::geometry::plot::PlotOptions;
use crate::geometry::{filter_and_format, FilterOptions, GeometryEngine, SessionState};
use crate::models::{HklRange, QWindow};
use crate::utils::output;

/// 执行 peaks 命令
pub fn execute(args: PeaksArgs) -> Result<()> {
    output::print_header("GIWAXS Bragg Peak Positions");

    let (lattice, warnings) = resolve_lattice(&args.lattice)?;
    for warning in &warnings {
        output::print_warning(warning);
    }

    let window = match (args.target_q, args.tol) {
        (Some(target), Some(tol)) => Some(QWindow::new(target, tol)?),
        _ => None,
    };

    let state = SessionState::new(lattice)
        .with_orientation(resolve_orientation(&args.orientation)?)
        .with_range(HklRange::parse(&args.hkl)?)
        .with_window(window)
        .with_mode(args.orientation.mode);

    let filter = FilterOptions {
        viewport: parse_viewport(args.viewport.as_deref())?,
        positive_only: args.positive,
        sort_key: args.sort,
        ascending: !args.desc,
    };

    output::print_info(&format!("Lattice: {}", state.lattice));
    output::print_info(&format!(
        "Orientation: {} ({})",
        state.orientation, state.mode
    ));
    output::print_info(&format!("HKL range: {}", state.range));
    if let Some(w) = state.window {
        output::print_info(&format!(
            "|q| window: {:.4} ± {:.4} Å⁻¹",
            w.target, w.tolerance
        ));
    }

    let engine = GeometryEngine::new(engine_config(&args.engine)?);
    output::print_debug(&format!("volume policy: {:?}", engine.config().volume_policy));
    let set = engine.compute(&state)?;
    output::print_debug(&format!(
        "enumerated {} peaks from {} candidate indices",
        set.peaks.len(),
        state.range.peak_count()
    ));

    let table = filter_and_format(&set.peaks, &filter);
    output::print_debug(&format!("{} peaks after filtering", table.len()));
    for peak in table.peaks.iter().take(10) {
        output::print_debug(&format!(
            "{} G = [{:.4}, {:.4}, {:.4}]",
            peak.hkl, peak.g[0], peak.g[1], peak.g[2]
        ));
    }

    print_peak_table(&table, args.top);
    output::print_success(&format!(
        "{} of {} peaks shown after filtering",
        table.len(),
        set.peaks.len()
    ));

    if let Some(path) = &args.output {
        let format = args
            .format
            .unwrap_or_else(|| guess_format_from_extension(path));
        let plot = PlotOptions {
            title: args
                .title
                .clone()
                .unwrap_or_else(|| state.lattice.to_string()),
            width: args.width,
            height: args.height,
            label_peaks: args.label_peaks,
            viewport: filter.viewport,
            use_svg: false,
        };
        write_output(&table, &state, path, format, &plot)?;
        output::print_success(&format!("{} saved to '{}'", format, path.display()));
    }

    Ok(())
}
