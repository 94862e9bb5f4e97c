//! 会话录制
//!
//! 按时间顺序记录发给控制器的命令，可以原样回放。
//!
//! ```json
//! {
//!   "name": "heel ulcer",
//!   "events": [
//!     { "at_ms": 0,   "command": { "TrackingUpdate": { "quality": "Normal", "camera_position": [0.05, 0.0, 0.25] } } },
//!     { "at_ms": 420, "command": { "Tap": [0.0, 0.0, 0.0] } },
//!     { "at_ms": 910, "command": { "Tap": null } },
//!     { "at_ms": 990, "command": "Undo" }
//!   ]
//! }
//! ```

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use woundm_core::config::MeasureConfig;
use woundm_core::controller::SessionCommand;

/// 单条录制事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// 相对录制开始的毫秒数
    #[serde(default)]
    pub at_ms: u64,
    pub command: SessionCommand,
}

/// 会话录制
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecording {
    #[serde(default)]
    pub name: Option<String>,
    /// 录制时使用的配置，回放时可被命令行参数覆盖
    #[serde(default)]
    pub config: Option<MeasureConfig>,
    pub events: Vec<RecordedEvent>,
}

impl SessionRecording {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// 追加一条事件
    pub fn push(&mut self, at_ms: u64, command: SessionCommand) {
        self.events.push(RecordedEvent { at_ms, command });
    }

    /// 按时间排序的命令序列
    pub fn commands(&self) -> Vec<SessionCommand> {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.at_ms);
        events.into_iter().map(|e| e.command).collect()
    }

    pub fn load(path: &Path) -> Result<Self, FileError> {
        let reader = BufReader::new(File::open(path)?);
        let recording: SessionRecording = serde_json::from_reader(reader)?;
        tracing::info!(
            "Loaded recording {} with {} events",
            path.display(),
            recording.events.len()
        );
        Ok(recording)
    }

    pub fn save(&self, path: &Path) -> Result<(), FileError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        tracing::info!("Saved recording to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use woundm_core::math::Point3;
    use woundm_core::tracking::{LimitedReason, TrackingQuality};

    #[test]
    fn test_parse_documented_format() {
        let json = r#"{
            "name": "heel ulcer",
            "events": [
                { "at_ms": 0, "command": { "TrackingUpdate": { "quality": { "Limited": "Initializing" }, "camera_position": null } } },
                { "at_ms": 420, "command": { "Tap": [0.0, 0.0, 0.0] } },
                { "at_ms": 910, "command": { "Tap": null } },
                { "at_ms": 990, "command": "Undo" },
                { "command": { "Finalize": { "image": null } } }
            ]
        }"#;
        let recording: SessionRecording = serde_json::from_str(json).unwrap();

        assert_eq!(recording.name.as_deref(), Some("heel ulcer"));
        assert!(recording.config.is_none());
        assert_eq!(
            recording.events[0].command,
            SessionCommand::TrackingUpdate {
                quality: TrackingQuality::Limited(LimitedReason::Initializing),
                camera_position: None,
            }
        );
        assert_eq!(recording.events[1].command, SessionCommand::Tap(Some(Point3::origin())));
        assert_eq!(recording.events[2].command, SessionCommand::Tap(None));
        assert_eq!(recording.events[4].at_ms, 0);
    }

    #[test]
    fn test_commands_sorted_by_time() {
        let mut recording = SessionRecording::new("out of order");
        recording.push(50, SessionCommand::Undo);
        recording.push(10, SessionCommand::Reset);

        assert_eq!(
            recording.commands(),
            vec![SessionCommand::Reset, SessionCommand::Undo]
        );
    }

    #[test]
    fn test_save_and_load() {
        let mut recording = SessionRecording::new("roundtrip");
        recording.push(0, SessionCommand::Tap(Some(Point3::new(0.1, 0.2, 0.3))));
        recording.push(5, SessionCommand::Finalize { image: None });

        let path = std::env::temp_dir().join(format!("recording-{}.json", uuid::Uuid::new_v4()));
        recording.save(&path).unwrap();
        let loaded = SessionRecording::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, recording);
    }
}
