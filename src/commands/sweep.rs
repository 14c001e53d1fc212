//! # sweep 子命令实现
//!
//! 沿一个取向角逐步扫描，每一帧独立计算并写出一个文件。
//!
//! ## 功能
//! - 帧之间没有共享可变状态，并行计算（rayon）
//! - 单帧失败只记录，不中断扫描
//! - 已存在的输出默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/sweep.rs` 定义的 SweepArgs
//! - 使用 `batch/` 模块进行并行处理
//! - 使用 `geometry/` 进行计算和输出

use super::common::{
    engine_config, parse_viewport, resolve_lattice, resolve_orientation, write_output,
};
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::common::OutputFormat;
use crate::cli::sweep::SweepArgs;
use crate::error::{EwaldError, Result};
use crate::geometry::plot::PlotOptions;
use crate::geometry::{filter_and_format, FilterOptions, GeometryEngine, SessionState};
use crate::models::{Axis, HklRange};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 单次扫描允许的最大帧数
const MAX_FRAMES: usize = 100_000;

/// 执行 sweep 命令
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("Orientation Sweep");

    let (lattice, warnings) = resolve_lattice(&args.lattice)?;
    for warning in &warnings {
        output::print_warning(warning);
    }

    let base = SessionState::new(lattice)
        .with_orientation(resolve_orientation(&args.orientation)?)
        .with_range(HklRange::parse(&args.hkl)?)
        .with_mode(args.orientation.mode);

    let engine = GeometryEngine::new(engine_config(&args.engine)?);
    // 晶格与转角无关，退化晶格在开始前就报错
    engine.bases(&base)?;

    let angles = sweep_angles(args.start, args.end, args.step)?;
    output::print_debug(&format!(
        "{} = {:.2}° from the base orientation is replaced by the sweep",
        args.axis,
        base.orientation.angle(args.axis)
    ));
    output::print_info(&format!(
        "Sweeping {} axis: {} frames from {:.2}° to {:.2}°",
        args.axis,
        angles.len(),
        args.start,
        angles.last().copied().unwrap_or(args.start)
    ));

    fs::create_dir_all(&args.output).map_err(|e| EwaldError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = FrameConfig {
        engine,
        base,
        axis: args.axis,
        filter: FilterOptions {
            viewport: parse_viewport(args.viewport.as_deref())?,
            positive_only: args.positive,
            ..Default::default()
        },
        output_dir: args.output.clone(),
        format: args.format,
        width: args.width,
        height: args.height,
        label_peaks: args.label_peaks,
        overwrite: args.overwrite,
    };

    let frames: Vec<(usize, f64)> = angles.into_iter().enumerate().collect();
    let runner = BatchRunner::new(args.jobs).with_progress(!output::is_verbose());
    output::print_debug(&format!("using {} worker threads", runner.jobs()));

    let result = runner.run(&frames, |&(index, angle)| process_frame(index, angle, &config))?;

    output::print_separator();
    output::print_done(&format!(
        "Sweep complete: {} frames ({} written, {} skipped, {} failed)",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed frames:");
        for (label, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", label, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 所有帧共享的只读配置
struct FrameConfig {
    engine: GeometryEngine,
    base: SessionState,
    axis: Axis,
    filter: FilterOptions,
    output_dir: PathBuf,
    format: OutputFormat,
    width: u32,
    height: u32,
    label_peaks: bool,
    overwrite: bool,
}

/// 生成扫描角度序列，包含起点；终点恰好落在步长上时也包含
pub fn sweep_angles(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(EwaldError::InvalidArgument(format!(
            "sweep bounds must be finite, got {} .. {}",
            start, end
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(EwaldError::InvalidArgument(format!(
            "--step = {} must be a positive number",
            step
        )));
    }

    // 在转换为整数之前比较，span 可能溢出为 inf
    let intervals = ((end - start).abs() / step + 1e-9).floor();
    if !intervals.is_finite() || intervals + 1.0 > MAX_FRAMES as f64 {
        return Err(EwaldError::InvalidArgument(format!(
            "sweep {} .. {} in steps of {} exceeds {} frames",
            start, end, step, MAX_FRAMES
        )));
    }
    let count = intervals as usize + 1;

    let signed_step = if end >= start { step } else { -step };
    Ok((0..count)
        .map(|i| start + i as f64 * signed_step)
        .collect())
}

/// 帧输出文件名
fn frame_path(dir: &Path, index: usize, axis: Axis, angle: f64, format: OutputFormat) -> PathBuf {
    dir.join(format!(
        "frame_{:04}_{}{:+08.2}.{}",
        index,
        axis,
        angle,
        format.extension()
    ))
}

/// 计算并写出单帧
fn process_frame(index: usize, angle: f64, config: &FrameConfig) -> ProcessResult {
    let path = frame_path(&config.output_dir, index, config.axis, angle, config.format);
    let label = format!("frame {} ({}={:.2}°)", index, config.axis, angle);

    if path.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!("Output exists, skipping: {}", path.display()));
    }

    match render_frame(angle, &path, config) {
        Ok(count) => ProcessResult::Success(format!("{}: {} peaks", label, count)),
        Err(e) => ProcessResult::Failed(label, e.to_string()),
    }
}

fn render_frame(angle: f64, path: &Path, config: &FrameConfig) -> Result<usize> {
    let orientation = config.base.orientation.with_angle(config.axis, angle);
    let state = config.base.with_orientation(orientation);
    let set = config.engine.compute(&state)?;
    let table = filter_and_format(&set.peaks, &config.filter);

    let plot = PlotOptions {
        title: format!("{} = {:.2}°", config.axis, angle),
        width: config.width,
        height: config.height,
        label_peaks: config.label_peaks,
        viewport: config.filter.viewport,
        use_svg: false,
    };
    write_output(&table, &state, path, config.format, &plot)?;
    Ok(table.len())
}
