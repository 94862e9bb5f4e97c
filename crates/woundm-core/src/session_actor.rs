//! 异步会话 Actor
//!
//! 所有对测量会话的修改都经过同一个消息通道，在 Actor 任务上按到达
//! 顺序串行执行。UI 点选和追踪层位姿更新即使来自不同线程，也不会
//! 并发修改同一个会话。
//!
//! 渲染帧通过 `watch` 通道发布，读取方拿到的是独立快照。

use crate::config::MeasureConfig;
use crate::controller::{CommandOutcome, MeasurementController, RenderFrame, SessionCommand};
use crate::error::MeasureError;
use crate::math::Point3;
use crate::result::{ImageRef, MeasurementResult};
use crate::tracking::TrackingQuality;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

type Reply = oneshot::Sender<Result<CommandOutcome, MeasureError>>;

struct Envelope {
    command: SessionCommand,
    reply: Option<Reply>,
}

/// 会话 Actor，独占控制器
pub struct SessionActor {
    controller: MeasurementController,
    receiver: mpsc::Receiver<Envelope>,
    frames: watch::Sender<RenderFrame>,
}

impl SessionActor {
    /// 创建 Actor 及其句柄
    pub fn new(controller: MeasurementController, capacity: usize) -> (Self, SessionHandle) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (frame_tx, frame_rx) = watch::channel(controller.frame());

        let actor = Self {
            controller,
            receiver,
            frames: frame_tx,
        };
        let handle = SessionHandle {
            sender,
            frames: frame_rx,
        };
        (actor, handle)
    }

    /// 在当前 tokio 运行时上启动
    pub fn spawn(config: MeasureConfig, capacity: usize) -> (SessionHandle, JoinHandle<()>) {
        let (actor, handle) = Self::new(MeasurementController::new(config), capacity);
        let join = tokio::spawn(actor.run());
        (handle, join)
    }

    /// 消息循环，所有句柄释放后退出
    pub async fn run(mut self) {
        while let Some(envelope) = self.receiver.recv().await {
            let outcome = self.controller.dispatch(envelope.command);

            match &outcome {
                Ok(CommandOutcome::Updated(frame)) => {
                    self.frames.send_replace(frame.clone());
                }
                Ok(CommandOutcome::Finalized(_)) => {
                    self.frames.send_replace(self.controller.frame());
                }
                Ok(CommandOutcome::Ignored) | Err(_) => {}
            }

            if let Some(reply) = envelope.reply {
                // 调用方可能已放弃等待
                let _ = reply.send(outcome);
            }
        }
        debug!("Session actor stopped");
    }
}

/// 会话句柄，可克隆并跨线程共享
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<Envelope>,
    frames: watch::Receiver<RenderFrame>,
}

impl SessionHandle {
    /// 发送命令并等待执行结果
    pub async fn send(&self, command: SessionCommand) -> Result<CommandOutcome, MeasureError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| MeasureError::SessionClosed)?;
        response.await.map_err(|_| MeasureError::SessionClosed)?
    }

    pub async fn tap(&self, hit: Option<Point3>) -> Result<CommandOutcome, MeasureError> {
        self.send(SessionCommand::Tap(hit)).await
    }

    pub async fn undo(&self) -> Result<CommandOutcome, MeasureError> {
        self.send(SessionCommand::Undo).await
    }

    pub async fn reset(&self) -> Result<CommandOutcome, MeasureError> {
        self.send(SessionCommand::Reset).await
    }

    pub async fn update_tracking(
        &self,
        quality: TrackingQuality,
        camera_position: Option<Point3>,
    ) -> Result<CommandOutcome, MeasureError> {
        self.send(SessionCommand::TrackingUpdate {
            quality,
            camera_position,
        })
        .await
    }

    /// 非阻塞地推送位姿更新，不等待结果
    ///
    /// 供追踪层回调线程使用；通道已满时返回错误，本次更新被丢弃。
    pub fn push_tracking(
        &self,
        quality: TrackingQuality,
        camera_position: Option<Point3>,
    ) -> Result<(), MeasureError> {
        self.sender
            .try_send(Envelope {
                command: SessionCommand::TrackingUpdate {
                    quality,
                    camera_position,
                },
                reply: None,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Closed(_) => MeasureError::SessionClosed,
                mpsc::error::TrySendError::Full(_) => {
                    debug!("Tracking update dropped, session queue full");
                    MeasureError::SessionBusy
                }
            })
    }

    /// 完成测量
    pub async fn finalize(&self, image: Option<ImageRef>) -> Result<MeasurementResult, MeasureError> {
        match self.send(SessionCommand::Finalize { image }).await? {
            CommandOutcome::Finalized(result) => Ok(result),
            _ => Err(MeasureError::UnexpectedOutcome {
                command: "Finalize",
            }),
        }
    }

    /// 订阅渲染帧
    pub fn frames(&self) -> watch::Receiver<RenderFrame> {
        self.frames.clone()
    }

    /// 最新渲染帧的快照
    pub fn latest_frame(&self) -> RenderFrame {
        self.frames.borrow().clone()
    }
}
