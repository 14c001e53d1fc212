//! # 峰表数据导出
//!
//! 导出筛选后的峰表到 CSV 和 DAT 格式。
//!
//! ## 支持格式
//! - CSV: q_xy, q_z, q, chi, d, h, k, l（带表头）
//! - DAT: 以 `#` 开头的注释头（晶格、取向、范围）+ 空白分隔的数据列
//!
//! ## 依赖关系
//! - 被 `commands/peaks.rs` 和 `commands/sweep.rs` 调用
//! - 使用 `geometry/table.rs` 的 PeakTable
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{EwaldError, Result};
use crate::geometry::engine::SessionState;
use crate::geometry::table::PeakTable;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 导出峰表为 CSV 格式
pub fn to_csv(table: &PeakTable, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for row in &table.rows {
        wtr.serialize(row)?;
    }

    // 空表也写出表头
    if table.rows.is_empty() {
        wtr.write_record(["q_xy", "q_z", "q", "chi", "d", "h", "k", "l"])?;
    }

    wtr.flush().map_err(|e| EwaldError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出峰表为 DAT 格式
pub fn to_dat(table: &PeakTable, state: &SessionState, output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| EwaldError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# Lattice: {}", state.lattice).map_err(write_err)?;
    writeln!(out, "# Orientation: {} ({})", state.orientation, state.mode).map_err(write_err)?;
    writeln!(out, "# HKL range: {}", state.range).map_err(write_err)?;
    if let Some(window) = state.window {
        writeln!(
            out,
            "# |q| window: {:.4} ± {:.4} 1/Angstrom",
            window.target, window.tolerance
        )
        .map_err(write_err)?;
    }
    writeln!(out, "# Columns: q_xy q_z (1/Angstrom), h, k, l").map_err(write_err)?;
    writeln!(out, "#").map_err(write_err)?;

    for row in &table.rows {
        writeln!(
            out,
            "{:.4}\t{:.4}\t{}\t{}\t{}",
            row.q_xy, row.q_z, row.h, row.k, row.l
        )
        .map_err(write_err)?;
    }

    out.flush().map_err(write_err)?;
    Ok(())
}
