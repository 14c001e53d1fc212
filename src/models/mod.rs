//! # 数据模型模块
//!
//! 定义晶格、取向和衍射峰的数据模型。
//!
//! ## 依赖关系
//! - 被 `geometry/` 和 `commands/` 使用
//! - 子模块: lattice, orientation, peak

pub mod lattice;
pub mod orientation;
pub mod peak;

pub use lattice::{CrystalSystem, LatticeParameters, RealBasis, ReciprocalBasis};
pub use orientation::{Axis, Orientation, RotationMode};
pub use peak::{HklRange, MillerIndex, Peak, QWindow};
