//! # 样品取向数据模型
//!
//! 取向由三个绕固定实验室坐标轴的转角表示：ω 绕 X、χ 绕 Y、φ 绕 Z。
//! 转动不可交换，顺序固定为 X → Y → Z。
//!
//! ## 依赖关系
//! - 被 `geometry/rotation.rs` 和 `commands/` 使用

use crate::error::{EwaldError, Result};
use crate::geometry::vector::Vec3;

use clap::ValueEnum;

/// 实验室坐标轴
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// 单位向量
    pub fn unit_vector(&self) -> Vec3 {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// 转动模式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Rodrigues rotations about X, then Y, then Z
    #[default]
    Sequential,
    /// Matrix product of X then Y rotations (phi ignored)
    TwoAngle,
}

impl std::fmt::Display for RotationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationMode::Sequential => write!(f, "sequential"),
            RotationMode::TwoAngle => write!(f, "two-angle"),
        }
    }
}

/// 样品取向（度）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// 绕 X 轴
    pub omega: f64,
    /// 绕 Y 轴
    pub chi: f64,
    /// 绕 Z 轴
    pub phi: f64,
}

impl Orientation {
    pub fn new(omega: f64, chi: f64, phi: f64) -> Result<Self> {
        let orientation = Orientation { omega, chi, phi };
        if !(omega.is_finite() && chi.is_finite() && phi.is_finite()) {
            return Err(EwaldError::InvalidArgument(format!(
                "orientation angles must be finite, got ({}, {}, {})",
                omega, chi, phi
            )));
        }
        Ok(orientation)
    }

    /// 按固定顺序给出转动步骤
    pub fn steps(&self) -> [(Axis, f64); 3] {
        [(Axis::X, self.omega), (Axis::Y, self.chi), (Axis::Z, self.phi)]
    }

    /// 读取某一轴的转角
    pub fn angle(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.omega,
            Axis::Y => self.chi,
            Axis::Z => self.phi,
        }
    }

    /// 返回替换某一轴转角后的新取向
    pub fn with_angle(&self, axis: Axis, angle: f64) -> Self {
        match axis {
            Axis::X => Orientation {
                omega: angle,
                ..*self
            },
            Axis::Y => Orientation { chi: angle, ..*self },
            Axis::Z => Orientation { phi: angle, ..*self },
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ω={:.2}° χ={:.2}° φ={:.2}°",
            self.omega, self.chi, self.phi
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_order() {
        let o = Orientation::new(10.0, 20.0, 30.0).unwrap();
        let axes: Vec<Axis> = o.steps().iter().map(|(axis, _)| *axis).collect();
        assert_eq!(axes, vec![Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(o.angle(Axis::Y), 20.0);
    }

    #[test]
    fn test_with_angle() {
        let o = Orientation::default().with_angle(Axis::Z, 45.0);
        assert_eq!(o, Orientation::new(0.0, 0.0, 45.0).unwrap());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(Orientation::new(f64::NAN, 0.0, 0.0).is_err());
    }
}
