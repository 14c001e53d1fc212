//! # 取向变换
//!
//! 绕任意轴转动实空间基矢（Rodrigues 公式），并按固定顺序组合成样品取向。
//!
//! ## 约定
//! - 所有转动均为绕固定实验室轴的主动右手转动
//! - 顺序转动中每一步都作用在上一步的结果上，顺序固定为 X → Y → Z
//! - 两角模式把 X、Y 两个转动矩阵整体右乘到基矢矩阵（行向量）上，
//!   结果与 φ = 0 的顺序转动一致
//!
//! ## 依赖关系
//! - 被 `geometry/engine.rs` 调用
//! - 使用 `models/orientation.rs` 的 Axis, Orientation, RotationMode

use crate::error::{EwaldError, Result};
use crate::geometry::vector::{add, cross, dot, norm, scale, sin_cos_deg, Vec3};
use crate::models::{Axis, Orientation, RealBasis, RotationMode};

/// 轴长度低于该值视为零向量
const AXIS_NORM_EPS: f64 = 1e-12;

/// 3×3 矩阵（行优先）
pub type Matrix3 = [[f64; 3]; 3];

/// 用 Rodrigues 公式转动单个向量，`axis` 必须已归一化
fn rodrigues(v: &Vec3, axis: &Vec3, sin_t: f64, cos_t: f64) -> Vec3 {
    // v cosθ + (k × v) sinθ + k (k · v)(1 - cosθ)
    let term1 = scale(v, cos_t);
    let term2 = scale(&cross(axis, v), sin_t);
    let term3 = scale(axis, dot(axis, v) * (1.0 - cos_t));
    add(&add(&term1, &term2), &term3)
}

/// 归一化转轴
fn normalize_axis(axis: &Vec3) -> Result<Vec3> {
    let n = norm(axis);
    if !n.is_finite() || n < AXIS_NORM_EPS {
        return Err(EwaldError::InvalidAxis { axis: *axis });
    }
    Ok(scale(axis, 1.0 / n))
}

/// 绕任意轴转动基矢
///
/// 轴不要求预先归一化；零向量轴返回 `InvalidAxis`。
pub fn rotate(basis: &RealBasis, axis: &Vec3, angle_deg: f64) -> Result<RealBasis> {
    let k = normalize_axis(axis)?;
    let (sin_t, cos_t) = sin_cos_deg(angle_deg);

    Ok(RealBasis::new(
        rodrigues(&basis.a, &k, sin_t, cos_t),
        rodrigues(&basis.b, &k, sin_t, cos_t),
        rodrigues(&basis.c, &k, sin_t, cos_t),
    ))
}

/// 依次执行一串单轴转动
pub fn rotate_sequence(basis: &RealBasis, steps: &[(Axis, f64)]) -> Result<RealBasis> {
    steps.iter().try_fold(*basis, |current, (axis, angle)| {
        rotate(&current, &axis.unit_vector(), *angle)
    })
}

/// 绕某一实验室轴转动的矩阵（主动右手转动）
pub fn rotation_matrix(axis: Axis, angle_deg: f64) -> Matrix3 {
    let (s, c) = sin_cos_deg(angle_deg);
    match axis {
        Axis::X => [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        Axis::Y => [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        Axis::Z => [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
    }
}

fn transpose(m: &Matrix3) -> Matrix3 {
    let mut t = [[0.0; 3]; 3];
    for (i, row) in m.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            t[j][i] = *value;
        }
    }
    t
}

fn mat_mul(lhs: &Matrix3, rhs: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = (0..3).map(|k| lhs[i][k] * rhs[k][j]).sum();
        }
    }
    out
}

/// 两角模式：基矢矩阵依次右乘 Rx^T、Ry^T
pub fn rotate_two_angle(basis: &RealBasis, theta_x: f64, theta_y: f64) -> RealBasis {
    let rx = rotation_matrix(Axis::X, theta_x);
    let ry = rotation_matrix(Axis::Y, theta_y);

    let m = mat_mul(&basis.rows(), &transpose(&rx));
    let m = mat_mul(&m, &transpose(&ry));
    RealBasis::from_rows(m)
}

/// 按取向和转动模式得到转动后的基矢
pub fn apply_orientation(
    basis: &RealBasis,
    orientation: &Orientation,
    mode: RotationMode,
) -> Result<RealBasis> {
    match mode {
        RotationMode::Sequential => rotate_sequence(basis, &orientation.steps()),
        RotationMode::TwoAngle => Ok(rotate_two_angle(
            basis,
            orientation.omega,
            orientation.chi,
        )),
    }
}
