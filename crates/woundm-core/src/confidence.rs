//! 置信度评分
//!
//! 融合三个因素得到 [0, 1] 区间的分数和可读评级：
//! - 追踪质量（外部信号）
//! - 各点到相机的平均距离
//! - 表面平整度
//!
//! 每个因素按分段加分，不理想时记录一条提示，附加在评级后面，
//! 例如 `Poor (tracking limited, too far, surface curved)`。

use crate::config::ConfidenceConfig;
use crate::tracking::TrackingQuality;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 评级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityGrade {
    pub fn name(&self) -> &'static str {
        match self {
            QualityGrade::Poor => "Poor",
            QualityGrade::Fair => "Fair",
            QualityGrade::Good => "Good",
            QualityGrade::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 降低置信度的因素提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caveat {
    TrackingLimited,
    TooClose,
    SlightlyTooClose,
    SlightlyTooFar,
    TooFar,
    SurfaceSlightlyCurved,
    SurfaceCurved,
}

impl Caveat {
    pub fn text(&self) -> &'static str {
        match self {
            Caveat::TrackingLimited => "tracking limited",
            Caveat::TooClose => "too close",
            Caveat::SlightlyTooClose => "slightly too close",
            Caveat::SlightlyTooFar => "slightly too far",
            Caveat::TooFar => "too far",
            Caveat::SurfaceSlightlyCurved => "surface slightly curved",
            Caveat::SurfaceCurved => "surface curved",
        }
    }
}

/// 置信度
///
/// 同时保存计算时使用的输入，便于审计，不会重新计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// 分数，[0, 1]
    pub score: f64,
    pub grade: QualityGrade,
    /// 评级及提示，如 `Good (slightly too far)`
    pub label: String,
    pub caveats: Vec<Caveat>,
    pub tracking: TrackingQuality,
    /// 平均相机距离（米）
    pub distance: Option<f64>,
    pub planarity: Option<f64>,
}

/// 置信度评分器
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// 计算置信度
    pub fn evaluate(
        &self,
        tracking: TrackingQuality,
        distance: Option<f64>,
        planarity: Option<f64>,
    ) -> Confidence {
        let c = &self.config;
        let mut score = c.base_score;
        let mut caveats = Vec::new();

        if tracking.is_good() {
            score += c.tracking_bonus;
        } else {
            caveats.push(Caveat::TrackingLimited);
        }

        if let Some(d) = distance {
            let (bonus, caveat) = self.distance_bucket(d);
            score += bonus;
            caveats.extend(caveat);
        }

        if let Some(p) = planarity {
            let (bonus, caveat) = self.planarity_bucket(p);
            score += bonus;
            caveats.extend(caveat);
        }

        let score = score.clamp(0.0, 1.0);
        let grade = self.grade(score);
        let label = if caveats.is_empty() {
            grade.name().to_string()
        } else {
            let notes: Vec<&str> = caveats.iter().map(Caveat::text).collect();
            format!("{} ({})", grade, notes.join(", "))
        };

        Confidence {
            score,
            grade,
            label,
            caveats,
            tracking,
            distance,
            planarity,
        }
    }

    fn distance_bucket(&self, d: f64) -> (f64, Option<Caveat>) {
        let c = &self.config;
        let (ideal_min, ideal_max) = c.ideal_distance;
        let (ok_min, ok_max) = c.acceptable_distance;

        if (ideal_min..=ideal_max).contains(&d) {
            (c.ideal_distance_bonus, None)
        } else if (ok_min..ideal_min).contains(&d) {
            (c.acceptable_distance_bonus, Some(Caveat::SlightlyTooClose))
        } else if d > ideal_max && d <= ok_max {
            (c.acceptable_distance_bonus, Some(Caveat::SlightlyTooFar))
        } else if d < ok_min {
            (0.0, Some(Caveat::TooClose))
        } else {
            (0.0, Some(Caveat::TooFar))
        }
    }

    fn planarity_bucket(&self, p: f64) -> (f64, Option<Caveat>) {
        let c = &self.config;
        if p < c.flat_threshold {
            (c.flat_bonus, None)
        } else if p < c.near_flat_threshold {
            (c.near_flat_bonus, None)
        } else if p < c.slightly_curved_threshold {
            (c.slightly_curved_bonus, Some(Caveat::SurfaceSlightlyCurved))
        } else {
            (0.0, Some(Caveat::SurfaceCurved))
        }
    }

    fn grade(&self, score: f64) -> QualityGrade {
        let c = &self.config;
        if score >= c.excellent_threshold {
            QualityGrade::Excellent
        } else if score >= c.good_threshold {
            QualityGrade::Good
        } else if score >= c.fair_threshold {
            QualityGrade::Fair
        } else {
            QualityGrade::Poor
        }
    }
}
