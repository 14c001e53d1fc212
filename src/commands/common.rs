//! # 命令共享逻辑
//!
//! 把 CLI 参数组转换为模型类型，以及峰表的打印和文件输出。
//!
//! ## 依赖关系
//! - 被 `commands/` 下各子命令使用
//! - 使用 `cli/common.rs` 的参数组
//! - 使用 `geometry/` 的导出与绘图

use crate::cli::common::{
    EngineInput, LatticeInput, OrientationInput, OutputFormat, VolumePolicyKind,
};
use crate::error::{EwaldError, Result};
use crate::geometry::plot::{generate_peak_plot, PlotOptions};
use crate::geometry::{export, EngineConfig, PeakTable, SessionState, Viewport, VolumePolicy};
use crate::models::{LatticeParameters, Orientation};
use crate::utils::output;

use std::path::Path;
use tabled::Table;

/// 解析晶格参数
///
/// 指定晶系时：预设值 → 显式覆盖 → 晶系约束。被约束覆盖的显式值作为警告返回。
/// 未指定晶系时六个参数都必须给出。
pub fn resolve_lattice(input: &LatticeInput) -> Result<(LatticeParameters, Vec<String>)> {
    let given = [
        ("a", input.a),
        ("b", input.b),
        ("c", input.c),
        ("alpha", input.alpha),
        ("beta", input.beta),
        ("gamma", input.gamma),
    ];

    let Some(system) = input.system else {
        let missing: Vec<&str> = given
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(EwaldError::InvalidArgument(format!(
                "missing lattice parameter(s) {}; give all six or choose a --system preset",
                missing.join(", ")
            )));
        }
        let [a, b, c, alpha, beta, gamma] = given.map(|(_, v)| v.unwrap_or_default());
        return Ok((LatticeParameters::new(a, b, c, alpha, beta, gamma)?, Vec::new()));
    };

    let preset = system.preset();
    let merged = LatticeParameters {
        a: input.a.unwrap_or(preset.a),
        b: input.b.unwrap_or(preset.b),
        c: input.c.unwrap_or(preset.c),
        alpha: input.alpha.unwrap_or(preset.alpha),
        beta: input.beta.unwrap_or(preset.beta),
        gamma: input.gamma.unwrap_or(preset.gamma),
    };
    let constrained = system.constrain(merged);
    constrained.validate()?;

    let final_values = [
        constrained.a,
        constrained.b,
        constrained.c,
        constrained.alpha,
        constrained.beta,
        constrained.gamma,
    ];
    let warnings = given
        .iter()
        .zip(final_values)
        .filter_map(|((name, value), used)| match value {
            Some(v) if *v != used => Some(format!(
                "{} = {} ignored: {} sets it to {}",
                name, v, system, used
            )),
            _ => None,
        })
        .collect();

    Ok((constrained, warnings))
}

/// 解析取向
pub fn resolve_orientation(input: &OrientationInput) -> Result<Orientation> {
    Orientation::new(input.omega, input.chi, input.phi)
}

/// 解析引擎配置
pub fn engine_config(input: &EngineInput) -> Result<EngineConfig> {
    let volume_policy = match input.volume_policy {
        VolumePolicyKind::Strict => VolumePolicy::Strict,
        VolumePolicyKind::Clamp => {
            if !input.clamp_epsilon.is_finite() || input.clamp_epsilon < 0.0 {
                return Err(EwaldError::InvalidArgument(format!(
                    "--clamp-epsilon = {} must be a non-negative number",
                    input.clamp_epsilon
                )));
            }
            VolumePolicy::Clamp {
                epsilon: input.clamp_epsilon,
            }
        }
    };
    Ok(EngineConfig { volume_policy })
}

/// 解析可选视窗字符串
pub fn parse_viewport(input: Option<&str>) -> Result<Option<Viewport>> {
    input.map(Viewport::parse).transpose()
}

/// 从文件扩展名推断输出格式
pub fn guess_format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("csv") => OutputFormat::Csv,
        Some("dat") | Some("txt") | Some("xy") => OutputFormat::Dat,
        _ => OutputFormat::Png,
    }
}

/// 按格式写出峰表
pub fn write_output(
    table: &PeakTable,
    state: &SessionState,
    path: &Path,
    format: OutputFormat,
    plot: &PlotOptions,
) -> Result<()> {
    match format {
        OutputFormat::Png => generate_peak_plot(
            table,
            path,
            &PlotOptions {
                use_svg: false,
                ..plot.clone()
            },
        ),
        OutputFormat::Svg => generate_peak_plot(
            table,
            path,
            &PlotOptions {
                use_svg: true,
                ..plot.clone()
            },
        ),
        OutputFormat::Csv => export::to_csv(table, path),
        OutputFormat::Dat => export::to_dat(table, state, path),
    }
}

/// 打印峰表，`top == 0` 时打印全部
pub fn print_peak_table(table: &PeakTable, top: usize) {
    if table.is_empty() {
        output::print_warning("No peaks pass the current filter");
        return;
    }

    let shown = if top == 0 { table.len() } else { top.min(table.len()) };
    println!("{}", Table::new(&table.rows[..shown]));

    if shown < table.len() {
        output::print_info(&format!(
            "... {} more rows (use --top 0 to show all)",
            table.len() - shown
        ));
    }
}
