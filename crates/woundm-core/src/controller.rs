//! 测量会话控制器
//!
//! 独占一个 `MeasurementSession`，响应外部事件（点选、撤销、重置、
//! 追踪更新、完成），每次成功修改后显式重新计算几何量、可视化线段
//! 和置信度，然后生成新的 `RenderFrame` 交给渲染层。

use crate::confidence::{Confidence, ConfidenceScorer};
use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::geometry::{average_distance_from, MeasurementGeometry};
use crate::math::Point3;
use crate::projector::{project_segments, Segment};
use crate::result::{ImageRef, MeasurementResult};
use crate::stage::{CaptureStage, MeasurementSession, MIN_POINTS_TO_SAVE};
use crate::tracking::TrackingQuality;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 会话命令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// 用户点选，`None` 表示射线未命中表面
    Tap(Option<Point3>),
    /// 撤销最后一点
    Undo,
    /// 清空所有点
    Reset,
    /// 追踪层位姿更新
    TrackingUpdate {
        quality: TrackingQuality,
        camera_position: Option<Point3>,
    },
    /// 完成测量
    Finalize { image: Option<ImageRef> },
}

/// 命令执行结果
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    /// 状态已更新，需要重绘
    Updated(RenderFrame),
    /// 命令被忽略（未命中表面、空会话撤销）
    Ignored,
    /// 测量完成，会话已丢弃
    Finalized(MeasurementResult),
}

/// 渲染帧
///
/// 每次修改后生成的只读快照，渲染层据此重绘。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub stage: CaptureStage,
    pub points: Vec<Point3>,
    pub segments: Vec<Segment>,
    pub length_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub area_cm2: Option<f64>,
    pub confidence: Option<Confidence>,
    pub can_undo: bool,
    pub can_save: bool,
    pub prompt: &'static str,
}

/// 会话控制器
#[derive(Debug, Clone)]
pub struct MeasurementController {
    config: MeasureConfig,
    scorer: ConfidenceScorer,
    session: MeasurementSession,
    tracking: TrackingQuality,
    camera_position: Option<Point3>,
    geometry: MeasurementGeometry,
    segments: Vec<Segment>,
    confidence: Option<Confidence>,
}

impl MeasurementController {
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            scorer: ConfidenceScorer::new(config.confidence.clone()),
            session: MeasurementSession::new(config.min_point_separation),
            config,
            tracking: TrackingQuality::default(),
            camera_position: None,
            geometry: MeasurementGeometry::default(),
            segments: Vec::new(),
            confidence: None,
        }
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    pub fn stage(&self) -> CaptureStage {
        self.session.stage()
    }

    pub fn geometry(&self) -> &MeasurementGeometry {
        &self.geometry
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn confidence(&self) -> Option<&Confidence> {
        self.confidence.as_ref()
    }

    pub fn tracking(&self) -> TrackingQuality {
        self.tracking
    }

    /// 执行一条命令
    pub fn dispatch(&mut self, command: SessionCommand) -> Result<CommandOutcome, MeasureError> {
        match command {
            SessionCommand::Tap(hit) => self.tap(hit),
            SessionCommand::Undo => Ok(self.undo()),
            SessionCommand::Reset => Ok(self.reset()),
            SessionCommand::TrackingUpdate {
                quality,
                camera_position,
            } => Ok(self.update_tracking(quality, camera_position)),
            SessionCommand::Finalize { image } => {
                let result = self.finalize(image)?;
                self.discard();
                Ok(CommandOutcome::Finalized(result))
            }
        }
    }

    /// 点选
    pub fn tap(&mut self, hit: Option<Point3>) -> Result<CommandOutcome, MeasureError> {
        let Some(point) = hit else {
            debug!("Tap missed surface, ignored");
            return Ok(CommandOutcome::Ignored);
        };

        if let Err(e) = self.session.add_point(point) {
            warn!("Tap rejected: {}", e);
            return Err(e);
        }

        self.recompute();
        Ok(CommandOutcome::Updated(self.frame()))
    }

    /// 撤销最后一点
    pub fn undo(&mut self) -> CommandOutcome {
        if self.session.remove_last_point().is_none() {
            return CommandOutcome::Ignored;
        }
        self.recompute();
        CommandOutcome::Updated(self.frame())
    }

    pub fn reset(&mut self) -> CommandOutcome {
        self.session.reset();
        self.recompute();
        CommandOutcome::Updated(self.frame())
    }

    /// 追踪层位姿更新
    ///
    /// 已有 2 点以上时重新计算置信度。
    pub fn update_tracking(
        &mut self,
        quality: TrackingQuality,
        camera_position: Option<Point3>,
    ) -> CommandOutcome {
        self.tracking = quality;
        if camera_position.is_some() {
            self.camera_position = camera_position;
        }
        self.confidence = self.evaluate_confidence();
        CommandOutcome::Updated(self.frame())
    }

    /// 打包测量结果，不修改点序列
    pub fn finalize(&self, image: Option<ImageRef>) -> Result<MeasurementResult, MeasureError> {
        if !self.session.can_save() {
            warn!(
                "Finalize requested with {} points, {} required",
                self.session.len(),
                MIN_POINTS_TO_SAVE
            );
            return Err(MeasureError::NotReady {
                points: self.session.len(),
                required: MIN_POINTS_TO_SAVE,
            });
        }

        let (Some(length_cm), Some(width_cm)) = (self.geometry.length_cm(), self.geometry.width_cm())
        else {
            return Err(MeasureError::DegenerateAxis);
        };

        let result = MeasurementResult::spatial(
            length_cm,
            width_cm,
            self.geometry.area_cm2(),
            self.confidence.clone(),
            image,
        );
        info!("Measurement finalized: {}", result);
        Ok(result)
    }

    /// 当前渲染帧
    pub fn frame(&self) -> RenderFrame {
        let stage = self.session.stage();
        RenderFrame {
            stage,
            points: self.session.points().to_vec(),
            segments: self.segments.clone(),
            length_cm: self.geometry.length_cm(),
            width_cm: self.geometry.width_cm(),
            area_cm2: self.geometry.area_cm2(),
            confidence: self.confidence.clone(),
            can_undo: stage.can_undo(),
            can_save: stage.can_save(),
            prompt: stage.prompt(),
        }
    }

    /// 丢弃当前会话，开始新会话；追踪状态保留
    fn discard(&mut self) {
        self.session = MeasurementSession::new(self.config.min_point_separation);
        self.recompute();
    }

    fn recompute(&mut self) {
        let points = self.session.points();
        self.geometry = MeasurementGeometry::derive(points, &self.config);
        self.segments = project_segments(points);
        self.confidence = self.evaluate_confidence();
        debug!(
            "Recomputed: {} points, length {:?} cm, width {:?} cm",
            points.len(),
            self.geometry.length_cm(),
            self.geometry.width_cm()
        );
    }

    fn evaluate_confidence(&self) -> Option<Confidence> {
        let points = self.session.points();
        if points.len() < 2 {
            return None;
        }
        let distance = self
            .camera_position
            .and_then(|camera| average_distance_from(points, &camera));
        Some(self.scorer.evaluate(self.tracking, distance, self.geometry.planarity))
    }
}

impl Default for MeasurementController {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}
