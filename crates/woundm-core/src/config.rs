//! 测量配置
//!
//! 默认值即参考行为；所有字段均可通过 JSON 配置文件覆盖，
//! 缺省字段回落到默认值。

use crate::math::Point3;
use serde::{Deserialize, Serialize};

/// 测量配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// 长度轴两端点的最小间距（米），小于此值的第二次点选被拒绝
    pub min_point_separation: f64,
    /// 面积系数（π/4，内切椭圆）
    pub area_factor: f64,
    /// 表面平整度计算方法
    pub planarity_method: PlanarityMethod,
    /// 置信度评分参数
    pub confidence: ConfidenceConfig,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            min_point_separation: 0.001,
            area_factor: 0.785,
            planarity_method: PlanarityMethod::default(),
            confidence: ConfidenceConfig::default(),
        }
    }
}

/// 深度轴（垂直于拍摄平面的坐标轴）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DepthAxis {
    X,
    Y,
    #[default]
    Z,
}

impl DepthAxis {
    /// 取点在该轴上的坐标
    pub fn component(&self, point: &Point3) -> f64 {
        match self {
            DepthAxis::X => point.x,
            DepthAxis::Y => point.y,
            DepthAxis::Z => point.z,
        }
    }
}

/// 平整度计算方法
///
/// 两种方法都满足"值越小越平"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanarityMethod {
    /// 深度轴坐标的总体标准差
    DepthDeviation { axis: DepthAxis },
    /// 最小二乘拟合平面的均方根残差
    PlaneFitResidual,
}

impl Default for PlanarityMethod {
    fn default() -> Self {
        PlanarityMethod::DepthDeviation {
            axis: DepthAxis::Z,
        }
    }
}

/// 置信度评分参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// 基础分
    pub base_score: f64,
    /// 追踪良好加分
    pub tracking_bonus: f64,

    /// 理想距离区间（米，闭区间）
    pub ideal_distance: (f64, f64),
    pub ideal_distance_bonus: f64,
    /// 可接受距离区间（米，闭区间），理想区间之外的部分
    pub acceptable_distance: (f64, f64),
    pub acceptable_distance_bonus: f64,

    /// 平整度阈值与加分，按阈值从小到大排列
    pub flat_threshold: f64,
    pub flat_bonus: f64,
    pub near_flat_threshold: f64,
    pub near_flat_bonus: f64,
    pub slightly_curved_threshold: f64,
    pub slightly_curved_bonus: f64,

    /// 评级阈值
    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub fair_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            tracking_bonus: 0.4,
            ideal_distance: (0.15, 0.35),
            ideal_distance_bonus: 0.3,
            acceptable_distance: (0.10, 0.50),
            acceptable_distance_bonus: 0.15,
            flat_threshold: 0.01,
            flat_bonus: 0.3,
            near_flat_threshold: 0.02,
            near_flat_bonus: 0.2,
            slightly_curved_threshold: 0.03,
            slightly_curved_bonus: 0.1,
            excellent_threshold: 0.9,
            good_threshold: 0.75,
            fair_threshold: 0.55,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let json = r#"{ "min_point_separation": 0.002 }"#;
        let config: MeasureConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.min_point_separation, 0.002);
        assert_eq!(config.area_factor, 0.785);
        assert_eq!(config.confidence, ConfidenceConfig::default());
    }

    #[test]
    fn test_planarity_method_from_json() {
        let json = r#"{ "planarity_method": "PlaneFitResidual" }"#;
        let config: MeasureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.planarity_method, PlanarityMethod::PlaneFitResidual);

        let json = r#"{ "planarity_method": { "DepthDeviation": { "axis": "Y" } } }"#;
        let config: MeasureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.planarity_method,
            PlanarityMethod::DepthDeviation { axis: DepthAxis::Y }
        );
    }

    #[test]
    fn test_depth_axis_component() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(DepthAxis::X.component(&p), 1.0);
        assert_eq!(DepthAxis::Y.component(&p), 2.0);
        assert_eq!(DepthAxis::Z.component(&p), 3.0);
    }
}
