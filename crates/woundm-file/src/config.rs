//! 测量配置文件（JSON）

use crate::error::FileError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use woundm_core::config::MeasureConfig;

/// 读取配置，缺省字段使用默认值
///
/// 长度轴最小间距与面积系数都必须为正数。
pub fn load_config(path: &Path) -> Result<MeasureConfig, FileError> {
    let reader = BufReader::new(File::open(path)?);
    let config: MeasureConfig = serde_json::from_reader(reader)?;

    let valid = config.min_point_separation > 0.0 && config.area_factor > 0.0;
    if !valid {
        return Err(FileError::InvalidFormat(format!(
            "Invalid config values in {}",
            path.display()
        )));
    }

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn save_config(config: &MeasureConfig, path: &Path) -> Result<(), FileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writer.flush()?;
    Ok(())
}
