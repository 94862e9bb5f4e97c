//! 测量错误定义
//!
//! 所有错误均为可恢复的局部错误：最坏结果是一次点选被拒绝，
//! 不会丢弃当前会话。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Point too close to previous point ({distance:.4} m < {min_separation:.4} m), please retap")]
    PointTooClose { distance: f64, min_separation: f64 },

    #[error("Capture already complete, {max_points} points held")]
    CaptureComplete { max_points: usize },

    #[error("Not enough points to finalize: {points} captured, {required} required")]
    NotReady { points: usize, required: usize },

    #[error("Degenerate length axis")]
    DegenerateAxis,

    #[error("Measurement session closed")]
    SessionClosed,

    #[error("Measurement session busy")]
    SessionBusy,

    #[error("Unexpected session outcome for {command}")]
    UnexpectedOutcome { command: &'static str },
}

impl MeasureError {
    /// 是否为需要用户重新点选的错误
    pub fn is_retap(&self) -> bool {
        matches!(self, MeasureError::PointTooClose { .. })
    }
}
