//! WoundM 文件格式处理
//!
//! 支持：
//! - `.json` 会话录制（事件脚本），用于回放和回归测试
//! - `.json` 测量配置
//! - `.wmr` 测量结果归档（MessagePack + Zstd）

pub mod archive;
pub mod config;
pub mod error;
pub mod recording;

pub use archive::{load_results, save_results};
pub use config::{load_config, save_config};
pub use error::FileError;
pub use recording::{RecordedEvent, SessionRecording};
