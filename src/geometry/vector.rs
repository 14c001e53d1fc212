//! # 三维向量工具
//!
//! 几何引擎使用的最小向量运算集合，向量统一表示为 `[f64; 3]`。
//!
//! ## 依赖关系
//! - 被 `geometry/` 其他子模块使用
//! - 无外部模块依赖

/// 三维笛卡尔向量
pub type Vec3 = [f64; 3];

/// 向量点积
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 向量叉积
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 向量模长
pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// 数乘
pub fn scale(a: &Vec3, factor: f64) -> Vec3 {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}

/// 向量加法
pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// 计算角度（度）的 (sin, cos)
///
/// 90° 的整数倍返回精确值，避免 `cos(90°) ≈ 6e-17` 这类残差
/// 进入后续的严格正值筛选。
pub fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    let reduced = angle_deg.rem_euclid(360.0);
    if reduced == 0.0 {
        (0.0, 1.0)
    } else if reduced == 90.0 {
        (1.0, 0.0)
    } else if reduced == 180.0 {
        (0.0, -1.0)
    } else if reduced == 270.0 {
        (-1.0, 0.0)
    } else {
        reduced.to_radians().sin_cos()
    }
}
