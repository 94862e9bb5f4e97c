//! 测量结果
//!
//! 每次成功的测量会话恰好产生一个结果，按值交给持久化等外部协作方，
//! 不持有对会话的引用。

use crate::confidence::Confidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 测量方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementMethod {
    /// 空间点选测量
    SpatialCapture,
    /// 手动输入
    Manual,
}

/// 拍摄图像引用
///
/// 图像本身由拍摄模块持有，这里只保存引用。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: Uuid,
    /// 图像位置（文件路径或 URI）
    pub uri: String,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uri: uri.into(),
        }
    }
}

/// 测量结果（厘米制）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub id: Uuid,
    pub length_cm: f64,
    pub width_cm: f64,
    pub area_cm2: Option<f64>,
    pub image: Option<ImageRef>,
    pub method: MeasurementMethod,
    pub confidence: Option<Confidence>,
    pub created_at: DateTime<Utc>,
}

impl MeasurementResult {
    /// 空间测量结果
    pub fn spatial(
        length_cm: f64,
        width_cm: f64,
        area_cm2: Option<f64>,
        confidence: Option<Confidence>,
        image: Option<ImageRef>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            length_cm,
            width_cm,
            area_cm2,
            image,
            method: MeasurementMethod::SpatialCapture,
            confidence,
            created_at: Utc::now(),
        }
    }

    /// 手动输入结果，面积按同样的椭圆系数计算
    pub fn manual(length_cm: f64, width_cm: f64, area_factor: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            length_cm,
            width_cm,
            area_cm2: Some(length_cm * width_cm * area_factor),
            image: None,
            method: MeasurementMethod::Manual,
            confidence: None,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} × {:.1} cm", self.length_cm, self.width_cm)?;
        if let Some(area) = self.area_cm2 {
            write!(f, " ({:.2} cm²)", area)?;
        }
        Ok(())
    }
}
