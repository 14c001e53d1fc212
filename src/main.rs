//! # Ewald - GIWAXS 倒空间几何计算工具
//!
//! 由晶格参数、样品取向和 Miller 指数范围计算 GIWAXS 探测器坐标
//! (q_xy, q_z) 下的 Bragg 衍射峰位置。
//!
//! ## 子命令
//! - `peaks`   - 计算并显示峰表，可输出 PNG/SVG/CSV/DAT
//! - `lattice` - 显示实空间 / 倒空间基矢
//! - `presets` - 列出晶系预设
//! - `sweep`   - 沿取向角扫描并逐帧输出
//! - `shell`   - 交互会话
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── geometry/ (基矢、转动、峰枚举、筛选、导出)
//!   │     ├── batch/    (并行扫描)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod geometry;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::output::set_verbose(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
