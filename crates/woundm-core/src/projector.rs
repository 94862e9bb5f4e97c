//! 可视化投影
//!
//! 根据点序列生成渲染层需要绘制的辅助线段，不修改任何状态。
//! 宽度只点选了伤口一侧，另一侧端点由长度轴镜像得到，
//! 使宽度指示线左右对称。

use crate::geometry::Axis;
use crate::math::Point3;
use serde::{Deserialize, Serialize};

/// 线段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// 长度线
    Length,
    /// 宽度线，`sample` 为宽度采样序号（0 对应第 2 点，1 对应第 3 点）
    Width { sample: usize },
}

/// 测量线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// 生成测量线段
///
/// 少于 2 点时为空；宽度线需要至少 3 点。
pub fn project_segments(points: &[Point3]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(3);

    let (p0, p1) = match points {
        [p0, p1, ..] => (*p0, *p1),
        _ => return segments,
    };
    segments.push(Segment {
        start: p0,
        end: p1,
        kind: SegmentKind::Length,
    });

    if let Some(axis) = Axis::through(&p0, &p1) {
        for (sample, point) in points.iter().skip(2).enumerate() {
            segments.push(Segment {
                start: *point,
                end: axis.mirror(point),
                kind: SegmentKind::Width { sample },
            });
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_segments_below_two_points() {
        assert!(project_segments(&[]).is_empty());
        assert!(project_segments(&[Point3::origin()]).is_empty());
    }

    #[test]
    fn test_length_segment_only() {
        let segments = project_segments(&[Point3::origin(), Point3::new(0.1, 0.0, 0.0)]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Length);
        assert!((segments[0].length() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_width_segment_is_mirrored() {
        let points = [
            Point3::origin(),
            Point3::new(0.1, 0.0, 0.0),
            Point3::new(0.07, 0.02, 0.0),
            Point3::new(0.04, -0.01, 0.0),
        ];
        let segments = project_segments(&points);
        assert_eq!(segments.len(), 3);

        let width = &segments[1];
        assert_eq!(width.kind, SegmentKind::Width { sample: 0 });
        assert_eq!(width.start, points[2]);
        assert!((width.end - Point3::new(0.07, -0.02, 0.0)).norm() < 1e-12);
        assert!((width.length() - crate::geometry::primary_width(&points).unwrap()).abs() < 1e-12);

        assert_eq!(segments[2].kind, SegmentKind::Width { sample: 1 });
        assert!((segments[2].end - Point3::new(0.04, 0.01, 0.0)).norm() < 1e-12);
    }
}
