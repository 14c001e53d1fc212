//! # presets 子命令实现
//!
//! 以表格列出全部晶系预设及其受约束参数。
//!
//! ## 依赖关系
//! - 使用 `models/lattice.rs` 的 CrystalSystem

use crate::error::Result;
use crate::models::CrystalSystem;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "system")]
    system: String,
    a: String,
    b: String,
    c: String,
    #[tabled(rename = "α")]
    alpha: String,
    #[tabled(rename = "β")]
    beta: String,
    #[tabled(rename = "γ")]
    gamma: String,
    #[tabled(rename = "constrained")]
    constrained: String,
}

/// 执行 presets 命令
pub fn execute() -> Result<()> {
    output::print_header("Crystal System Presets");

    let rows: Vec<PresetRow> = CrystalSystem::ALL
        .iter()
        .map(|system| {
            let p = system.preset();
            let dependent = system.dependent_fields();
            PresetRow {
                system: system.to_string(),
                a: format!("{:.2}", p.a),
                b: format!("{:.2}", p.b),
                c: format!("{:.2}", p.c),
                alpha: format!("{:.1}", p.alpha),
                beta: format!("{:.1}", p.beta),
                gamma: format!("{:.1}", p.gamma),
                constrained: if dependent.is_empty() {
                    "-".to_string()
                } else {
                    dependent.join(", ")
                },
            }
        })
        .collect();

    println!("{}", Table::new(&rows));
    output::print_info("Use --system NAME with explicit values to override the free parameters");
    Ok(())
}
