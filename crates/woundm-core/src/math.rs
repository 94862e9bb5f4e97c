//! 三维向量运算
//!
//! 基于 nalgebra 的类型别名与辅助函数。所有坐标处于追踪空间参考系，
//! 单位约定为米。

use nalgebra as na;

/// 三维点
pub type Point3 = na::Point3<f64>;

/// 三维向量
pub type Vector3 = na::Vector3<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-10;

/// 两点间欧氏距离
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    na::distance(a, b)
}

/// 单位化向量
///
/// 零长度向量无法单位化，返回 `None`。
pub fn normalize(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(EPSILON)
}

pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
    a.cross(b)
}

/// 两点中点
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    na::center(a, b)
}

/// 点相对直线的投影分量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineProjection {
    /// 沿直线方向的分量
    pub along: Vector3,
    /// 垂直于直线的分量
    pub perpendicular: Vector3,
}

/// 将点投影到直线上，分解为平行分量与垂直分量
///
/// `line_direction` 必须是单位向量。
pub fn decompose_onto_line(point: &Point3, line_point: &Point3, line_direction: &Vector3) -> LineProjection {
    let offset = point - line_point;
    let along = line_direction * dot(&offset, line_direction);
    LineProjection {
        along,
        perpendicular: offset - along,
    }
}

/// 点到直线的垂直分量向量
///
/// `line_direction` 必须是单位向量。
pub fn project_onto_line(point: &Point3, line_point: &Point3, line_direction: &Vector3) -> Vector3 {
    decompose_onto_line(point, line_point, line_direction).perpendicular
}
