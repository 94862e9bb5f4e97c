//! 几何推导
//!
//! 对点序列的纯函数读取，点数不足时返回 `None`，从不 panic：
//! - 长度：第 0、1 点的距离
//! - 宽度：宽度采样点到长度轴垂直距离的两倍（点选视为伤口一侧边缘）
//! - 平均宽度：两个宽度采样的均值
//! - 面积：长 × 宽 × π/4（内切椭圆近似）
//! - 表面平整度：值越小越平
//! - 平均相机距离

use crate::config::{MeasureConfig, PlanarityMethod};
use crate::math::{decompose_onto_line, distance, midpoint, normalize, LineProjection, Point3, Vector3};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// 米到厘米
pub const CM_PER_M: f64 = 100.0;

/// 长度轴：第 0、1 点定义的直线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// 轴中点
    pub midpoint: Point3,
    /// 轴方向（单位向量）
    pub direction: Vector3,
}

impl Axis {
    /// 由两点构造长度轴，两点重合时返回 `None`
    pub fn through(start: &Point3, end: &Point3) -> Option<Self> {
        let direction = normalize(&(end - start))?;
        Some(Self {
            midpoint: midpoint(start, end),
            direction,
        })
    }

    /// 取点序列的长度轴
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        match points {
            [p0, p1, ..] => Self::through(p0, p1),
            _ => None,
        }
    }

    /// 点相对轴中点的投影分解
    pub fn decompose(&self, point: &Point3) -> LineProjection {
        decompose_onto_line(point, &self.midpoint, &self.direction)
    }

    /// 点关于长度轴的镜像点
    pub fn mirror(&self, point: &Point3) -> Point3 {
        let proj = self.decompose(point);
        self.midpoint + proj.along - proj.perpendicular
    }

    /// 宽度采样：垂直距离的两倍
    pub fn width_sample(&self, point: &Point3) -> f64 {
        2.0 * self.decompose(point).perpendicular.norm()
    }
}

/// 长度（米）
pub fn length(points: &[Point3]) -> Option<f64> {
    match points {
        [p0, p1, ..] => Some(distance(p0, p1)),
        _ => None,
    }
}

/// 第 `index` 个点的宽度采样（米），仅对第 2、3 点有意义
pub fn width_sample(points: &[Point3], index: usize) -> Option<f64> {
    if index < 2 {
        return None;
    }
    let point = points.get(index)?;
    Axis::from_points(points).map(|axis| axis.width_sample(point))
}

/// 主宽度（米），使用第 2 点
pub fn primary_width(points: &[Point3]) -> Option<f64> {
    width_sample(points, 2)
}

/// 平均宽度（米）
///
/// 存在第 3 点时取两个采样的均值，否则等于主宽度。
pub fn averaged_width(points: &[Point3]) -> Option<f64> {
    let primary = primary_width(points)?;
    match width_sample(points, 3) {
        Some(secondary) => Some((primary + secondary) / 2.0),
        None => Some(primary),
    }
}

/// 面积（平方米）
pub fn area(points: &[Point3], area_factor: f64) -> Option<f64> {
    Some(length(points)? * averaged_width(points)? * area_factor)
}

/// 表面平整度，少于 3 点时无定义
pub fn surface_planarity(points: &[Point3], method: PlanarityMethod) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len() as f64;

    match method {
        PlanarityMethod::DepthDeviation { axis } => {
            let mean = points.iter().map(|p| axis.component(p)).sum::<f64>() / n;
            let variance = points
                .iter()
                .map(|p| {
                    let d = axis.component(p) - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            Some(variance.sqrt())
        }
        PlanarityMethod::PlaneFitResidual => {
            let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n;
            let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
                let d = p.coords - centroid;
                acc + d * d.transpose()
            }) / n;

            // 最小特征值即点到拟合平面的均方距离
            let min_eigen = covariance.symmetric_eigenvalues().min();
            Some(min_eigen.max(0.0).sqrt())
        }
    }
}

/// 各点到参考位置（相机）的平均距离（米）
pub fn average_distance_from(points: &[Point3], reference: &Point3) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let total: f64 = points.iter().map(|p| distance(p, reference)).sum();
    Some(total / points.len() as f64)
}

/// 一次推导出的全部几何量（米制）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementGeometry {
    pub length_m: Option<f64>,
    pub primary_width_m: Option<f64>,
    pub secondary_width_m: Option<f64>,
    pub width_m: Option<f64>,
    pub area_m2: Option<f64>,
    pub planarity: Option<f64>,
}

impl MeasurementGeometry {
    pub fn derive(points: &[Point3], config: &MeasureConfig) -> Self {
        Self {
            length_m: length(points),
            primary_width_m: primary_width(points),
            secondary_width_m: width_sample(points, 3),
            width_m: averaged_width(points),
            area_m2: area(points, config.area_factor),
            planarity: surface_planarity(points, config.planarity_method),
        }
    }

    pub fn length_cm(&self) -> Option<f64> {
        self.length_m.map(|v| v * CM_PER_M)
    }

    pub fn width_cm(&self) -> Option<f64> {
        self.width_m.map(|v| v * CM_PER_M)
    }

    pub fn area_cm2(&self) -> Option<f64> {
        self.area_m2.map(|v| v * CM_PER_M * CM_PER_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DepthAxis;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion};

    const TOL: f64 = 1e-9;

    fn wound_points() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.10, 0.0, 0.0),
            Point3::new(0.05, 0.02, 0.0),
            Point3::new(0.05, -0.018, 0.0),
        ]
    }

    #[test]
    fn test_length() {
        let points = wound_points();
        assert!(length(&points[..1]).is_none());
        assert_eq!(length(&points[..2]), Some(distance(&points[0], &points[1])));
    }

    #[test]
    fn test_widths() {
        let points = wound_points();
        assert!(primary_width(&points[..2]).is_none());

        let w = primary_width(&points[..3]).unwrap();
        assert!((w - 0.04).abs() < TOL);
        assert!((averaged_width(&points[..3]).unwrap() - 0.04).abs() < TOL);

        let w2 = width_sample(&points, 3).unwrap();
        assert!((w2 - 0.036).abs() < TOL);
        assert!((averaged_width(&points).unwrap() - 0.038).abs() < TOL);
    }

    #[test]
    fn test_width_ignores_position_along_axis() {
        let mut points = wound_points();
        points[2] = Point3::new(0.09, 0.02, 0.0);
        assert!((primary_width(&points[..3]).unwrap() - 0.04).abs() < TOL);
    }

    #[test]
    fn test_area() {
        let points = wound_points();
        assert!(area(&points[..2], 0.785).is_none());

        let a = area(&points, 0.785).unwrap();
        let expected = length(&points).unwrap() * averaged_width(&points).unwrap() * 0.785;
        assert!((a - expected).abs() < TOL);
    }

    #[test]
    fn test_width_invariant_under_rigid_transform() {
        let points = wound_points();
        let iso = Isometry3::from_parts(
            Translation3::new(1.5, -0.3, 0.7),
            UnitQuaternion::from_euler_angles(0.3, -1.1, 2.0),
        );
        let moved: Vec<Point3> = points.iter().map(|p| iso * p).collect();

        assert!((primary_width(&points).unwrap() - primary_width(&moved).unwrap()).abs() < TOL);
        assert!((averaged_width(&points).unwrap() - averaged_width(&moved).unwrap()).abs() < TOL);
        assert!((length(&points).unwrap() - length(&moved).unwrap()).abs() < TOL);
    }

    #[test]
    fn test_width_scales_linearly() {
        let points = wound_points();
        let scaled: Vec<Point3> = points.iter().map(|p| Point3::from(p.coords * 3.0)).collect();
        assert!((primary_width(&scaled).unwrap() - 3.0 * primary_width(&points).unwrap()).abs() < TOL);
    }

    #[test]
    fn test_planarity_depth_deviation() {
        let method = PlanarityMethod::DepthDeviation { axis: DepthAxis::Z };
        let mut points = wound_points();
        assert!(surface_planarity(&points[..2], method).is_none());
        assert!(surface_planarity(&points, method).unwrap().abs() < TOL);

        // z = [0, 0, 0.02, -0.02] -> 总体标准差 sqrt(0.0002)
        points[2].z = 0.02;
        points[3].z = -0.02;
        let sigma = surface_planarity(&points, method).unwrap();
        assert!((sigma - 0.0002_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn test_planarity_plane_fit() {
        // 倾斜平面上的点残差为零
        let tilted: Vec<Point3> = wound_points()
            .iter()
            .map(|p| Point3::new(p.x, p.y, 0.5 * p.x + 0.2 * p.y))
            .collect();
        let residual = surface_planarity(&tilted, PlanarityMethod::PlaneFitResidual).unwrap();
        assert!(residual < 1e-6);

        let mut bumpy = tilted.clone();
        bumpy[3].z += 0.01;
        let residual_bumpy = surface_planarity(&bumpy, PlanarityMethod::PlaneFitResidual).unwrap();
        assert!(residual_bumpy > residual);
    }

    #[test]
    fn test_average_distance() {
        assert!(average_distance_from(&[], &Point3::origin()).is_none());

        let points = [Point3::new(0.0, 0.0, 0.2), Point3::new(0.0, 0.0, 0.4)];
        let d = average_distance_from(&points, &Point3::origin()).unwrap();
        assert!((d - 0.3).abs() < TOL);
    }

    #[test]
    fn test_mirror() {
        let points = wound_points();
        let axis = Axis::from_points(&points).unwrap();
        let mirrored = axis.mirror(&points[2]);
        assert!((mirrored - Point3::new(0.05, -0.02, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_geometry_bundle_units() {
        let geometry = MeasurementGeometry::derive(&wound_points(), &MeasureConfig::default());
        assert!((geometry.length_cm().unwrap() - 10.0).abs() < 1e-6);
        assert!((geometry.width_cm().unwrap() - 3.8).abs() < 1e-6);
        assert!((geometry.area_cm2().unwrap() - 29.83).abs() < 1e-6);
    }
}
