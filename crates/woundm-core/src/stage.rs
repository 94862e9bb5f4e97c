//! 测量状态机
//!
//! 参考绘图 Action 的状态机设计：点列表是唯一的状态来源，
//! 阶段 (`CaptureStage`) 永远由点数推导，不单独存储。
//!
//! 点的语义由插入顺序决定：
//! - 第 0、1 点：长度轴
//! - 第 2 点：宽度采样
//! - 第 3 点（可选）：第二个宽度采样，用于取平均

use crate::error::MeasureError;
use crate::math::{distance, normalize, Point3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 最多采集的点数
pub const MAX_POINTS: usize = 4;

/// 允许保存所需的最少点数（长度轴 + 一个宽度采样）
pub const MIN_POINTS_TO_SAVE: usize = 3;

/// 采集阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureStage {
    /// 等待第一点
    AwaitingFirst,
    /// 等待第二点
    AwaitingSecond,
    /// 等待第三点
    AwaitingThird,
    /// 等待第四点
    AwaitingFourth,
    /// 采集完成
    Complete,
}

impl CaptureStage {
    /// 由点数推导阶段
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => CaptureStage::AwaitingFirst,
            1 => CaptureStage::AwaitingSecond,
            2 => CaptureStage::AwaitingThird,
            3 => CaptureStage::AwaitingFourth,
            _ => CaptureStage::Complete,
        }
    }

    /// 阶段序号 (0..=4)
    pub fn index(&self) -> usize {
        match self {
            CaptureStage::AwaitingFirst => 0,
            CaptureStage::AwaitingSecond => 1,
            CaptureStage::AwaitingThird => 2,
            CaptureStage::AwaitingFourth => 3,
            CaptureStage::Complete => 4,
        }
    }

    pub fn can_undo(&self) -> bool {
        *self != CaptureStage::AwaitingFirst
    }

    pub fn can_save(&self) -> bool {
        self.index() >= MIN_POINTS_TO_SAVE
    }

    /// 当前阶段的操作提示
    pub fn prompt(&self) -> &'static str {
        match self {
            CaptureStage::AwaitingFirst => "Tap one end of the wound's length",
            CaptureStage::AwaitingSecond => "Tap the opposite end of the wound's length",
            CaptureStage::AwaitingThird => "Tap the widest edge of the wound",
            CaptureStage::AwaitingFourth => "Tap the opposite edge to refine width, or save",
            CaptureStage::Complete => "Measurement complete",
        }
    }
}

/// 测量会话
///
/// 只能通过 `add_point` / `remove_last_point` / `reset` 修改。
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    points: Vec<Point3>,
    min_separation: f64,
}

impl MeasurementSession {
    pub fn new(min_separation: f64) -> Self {
        Self {
            points: Vec::with_capacity(MAX_POINTS),
            min_separation,
        }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn stage(&self) -> CaptureStage {
        CaptureStage::from_count(self.points.len())
    }

    pub fn can_undo(&self) -> bool {
        self.stage().can_undo()
    }

    pub fn can_save(&self) -> bool {
        self.stage().can_save()
    }

    /// 追加一个点
    ///
    /// 已满 4 点时拒绝；第二点与第一点重合时拒绝（长度轴退化）。
    /// 即使最小间距配置为 0，无法确定方向的长度轴也会被拒绝。
    pub fn add_point(&mut self, point: Point3) -> Result<CaptureStage, MeasureError> {
        if self.points.len() >= MAX_POINTS {
            return Err(MeasureError::CaptureComplete {
                max_points: MAX_POINTS,
            });
        }

        if self.points.len() == 1 {
            let d = distance(&self.points[0], &point);
            if d < self.min_separation || normalize(&(point - self.points[0])).is_none() {
                return Err(MeasureError::PointTooClose {
                    distance: d,
                    min_separation: self.min_separation,
                });
            }
        }

        self.points.push(point);
        debug!("Point {} added, stage {:?}", self.points.len(), self.stage());
        Ok(self.stage())
    }

    /// 移除最后一个点，空会话时不做任何事
    pub fn remove_last_point(&mut self) -> Option<Point3> {
        let removed = self.points.pop();
        if removed.is_some() {
            debug!("Last point removed, stage {:?}", self.stage());
        }
        removed
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }
}
