//! WoundM 测量核心引擎
//!
//! 将用户在三维表面上的一系列点选转换为伤口的长度、宽度、面积估计，
//! 并给出置信度评分。
//!
//! # 架构设计
//!
//! 数据单向流动：
//! - 追踪层提供的三维点 → `MeasurementSession`（状态机）
//! - 几何推导 (`geometry`) 与可视化投影 (`projector`) 读取点序列
//! - 置信度评分 (`confidence`) 读取推导结果与追踪信号
//! - `MeasurementController` 组装最终的 `MeasurementResult`
//!
//! 多线程环境下由 `SessionActor` 提供唯一的串行化入口。
//!
//! # 示例
//!
//! ```rust
//! use woundm_core::prelude::*;
//!
//! let mut controller = MeasurementController::default();
//! controller.tap(Some(Point3::new(0.0, 0.0, 0.0))).unwrap();
//! controller.tap(Some(Point3::new(0.10, 0.0, 0.0))).unwrap();
//! controller.tap(Some(Point3::new(0.05, 0.02, 0.0))).unwrap();
//!
//! let result = controller.finalize(None).unwrap();
//! println!("Wound: {}", result);
//! ```

pub mod config;
pub mod confidence;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod math;
pub mod projector;
pub mod result;
pub mod session_actor;
pub mod stage;
pub mod tracking;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::{ConfidenceConfig, DepthAxis, MeasureConfig, PlanarityMethod};
    pub use crate::confidence::{Caveat, Confidence, ConfidenceScorer, QualityGrade};
    pub use crate::controller::{CommandOutcome, MeasurementController, RenderFrame, SessionCommand};
    pub use crate::error::MeasureError;
    pub use crate::geometry::{Axis, MeasurementGeometry};
    pub use crate::math::{Point3, Vector3};
    pub use crate::projector::{project_segments, Segment, SegmentKind};
    pub use crate::result::{ImageRef, MeasurementMethod, MeasurementResult};
    pub use crate::session_actor::{SessionActor, SessionHandle};
    pub use crate::stage::{CaptureStage, MeasurementSession};
    pub use crate::tracking::{LimitedReason, TrackingQuality};
}
