//! # lattice 子命令实现
//!
//! 打印实空间基矢、转动后的基矢、倒空间基矢与晶胞体积。
//!
//! ## 依赖关系
//! - 使用 `cli/lattice.rs` 定义的 LatticeArgs
//! - 使用 `geometry/engine.rs`

use super::common::{engine_config, resolve_lattice, resolve_orientation};
use crate::cli::lattice::LatticeArgs;
use crate::error::Result;
use crate::geometry::basis::cell_volume;
use crate::geometry::vector::{norm, Vec3};
use crate::geometry::{GeometryEngine, SessionState};
use crate::utils::output;

/// 执行 lattice 命令
pub fn execute(args: LatticeArgs) -> Result<()> {
    output::print_header("Lattice Basis Vectors");

    let (lattice, warnings) = resolve_lattice(&args.lattice)?;
    for warning in &warnings {
        output::print_warning(warning);
    }

    let state = SessionState::new(lattice)
        .with_orientation(resolve_orientation(&args.orientation)?)
        .with_mode(args.orientation.mode);

    let engine = GeometryEngine::new(engine_config(&args.engine)?);
    let (real, rotated, reciprocal) = engine.bases(&state)?;

    output::print_field("Parameters", &state.lattice.to_string());
    output::print_field("Orientation", &format!("{} ({})", state.orientation, state.mode));
    output::print_field("Volume", &format!("{:.4} Å³", cell_volume(&real)));
    if let Ok(v) = state.lattice.volume() {
        output::print_debug(&format!("closed-form volume: {:.6} Å³", v));
    }

    output::print_separator();
    println!("  Real space (Å), unrotated");
    print_vector("a", &real.a);
    print_vector("b", &real.b);
    print_vector("c", &real.c);

    output::print_separator();
    println!("  Real space (Å), oriented");
    print_vector("a", &rotated.a);
    print_vector("b", &rotated.b);
    print_vector("c", &rotated.c);

    output::print_separator();
    println!("  Reciprocal space (Å⁻¹)");
    print_vector("a*", &reciprocal.a_star);
    print_vector("b*", &reciprocal.b_star);
    print_vector("c*", &reciprocal.c_star);

    Ok(())
}

fn print_vector(name: &str, v: &Vec3) {
    output::print_field(
        name,
        &format!(
            "[{:>10.4} {:>10.4} {:>10.4}]  |{}| = {:.4}",
            v[0],
            v[1],
            v[2],
            name,
            norm(v)
        ),
    );
}
