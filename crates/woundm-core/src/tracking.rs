//! 空间追踪质量描述
//!
//! 由外部追踪层在每次位姿更新时推送。

use serde::{Deserialize, Serialize};

/// 追踪受限原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitedReason {
    /// 正在初始化
    Initializing,
    /// 设备移动过快
    ExcessiveMotion,
    /// 画面特征点不足
    InsufficientFeatures,
    /// 正在重定位
    Relocalizing,
}

/// 追踪质量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrackingQuality {
    /// 追踪稳定
    Normal,
    /// 追踪受限
    Limited(LimitedReason),
    /// 追踪不可用
    #[default]
    NotAvailable,
}

impl TrackingQuality {
    /// 仅 `Normal` 视为良好
    pub fn is_good(&self) -> bool {
        matches!(self, TrackingQuality::Normal)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrackingQuality::Normal => "Tracking normal",
            TrackingQuality::Limited(LimitedReason::Initializing) => "Tracking initializing",
            TrackingQuality::Limited(LimitedReason::ExcessiveMotion) => "Moving too fast",
            TrackingQuality::Limited(LimitedReason::InsufficientFeatures) => "Not enough surface detail",
            TrackingQuality::Limited(LimitedReason::Relocalizing) => "Relocalizing",
            TrackingQuality::NotAvailable => "Tracking not available",
        }
    }
}
