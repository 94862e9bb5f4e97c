//! 测量结果归档（.wmr）
//!
//! 基于 MessagePack + Zstd 的紧凑二进制格式，一个文件保存多条结果。
//! 文件头 16 字节，小端序：魔数、格式版本、标志位、压缩数据长度。

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use woundm_core::result::MeasurementResult;

/// 文件魔数 "WMRS"
const MAGIC: &[u8; 4] = b"WMRS";

/// 当前文件格式版本
const FORMAT_VERSION: u32 = 1;

/// Zstd 压缩级别
const COMPRESSION_LEVEL: i32 = 3;

/// 文件头长度
const HEADER_SIZE: u64 = 16;

/// 文件头（16 字节）
#[derive(Debug)]
struct FileHeader {
    magic: [u8; 4],
    version: u32,
    /// 标志位（预留）
    flags: u32,
    compressed_size: u32,
}

impl FileHeader {
    fn new(compressed_size: u32) -> Self {
        Self {
            magic: *MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            compressed_size,
        }
    }

    fn write(&self, writer: &mut impl Write) -> Result<(), std::io::Error> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        Ok(())
    }

    fn read(reader: &mut impl Read) -> Result<Self, FileError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if &magic != MAGIC {
            return Err(FileError::InvalidFormat(
                "Invalid magic number, not a WoundM result archive".to_string(),
            ));
        }

        let mut buf = [0u8; 4];

        reader.read_exact(&mut buf)?;
        let version = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let flags = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let compressed_size = u32::from_le_bytes(buf);

        Ok(Self {
            magic,
            version,
            flags,
            compressed_size,
        })
    }
}

/// 可序列化的文件内容
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveContent {
    results: Vec<MeasurementResult>,
}

/// 保存测量结果
pub fn save_results(results: &[MeasurementResult], path: &Path) -> Result<(), FileError> {
    let content = ArchiveContent {
        results: results.to_vec(),
    };

    let msgpack_data = rmp_serde::to_vec(&content)?;
    let compressed_data = zstd::encode_all(msgpack_data.as_slice(), COMPRESSION_LEVEL)?;

    let compressed_size = u32::try_from(compressed_data.len())
        .map_err(|_| FileError::InvalidFormat("Archive too large".to_string()))?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    FileHeader::new(compressed_size).write(&mut writer)?;
    writer.write_all(&compressed_data)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} results to {} ({} bytes compressed)",
        results.len(),
        path.display(),
        compressed_data.len()
    );

    Ok(())
}

/// 读取测量结果
pub fn load_results(path: &Path) -> Result<Vec<MeasurementResult>, FileError> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let header = FileHeader::read(&mut reader)?;
    if header.version > FORMAT_VERSION {
        return Err(FileError::UnsupportedVersion(format!(
            "Archive version {} is newer than supported version {}",
            header.version, FORMAT_VERSION
        )));
    }

    // 声明的数据长度不能超过文件剩余长度
    let available = file_size.saturating_sub(HEADER_SIZE);
    if u64::from(header.compressed_size) > available {
        return Err(FileError::InvalidFormat(format!(
            "Header declares {} bytes but only {} remain",
            header.compressed_size, available
        )));
    }

    let mut compressed_data = vec![0u8; header.compressed_size as usize];
    reader.read_exact(&mut compressed_data)?;

    let msgpack_data = zstd::decode_all(compressed_data.as_slice())?;
    let content: ArchiveContent = rmp_serde::from_slice(&msgpack_data)?;

    tracing::info!(
        "Loaded {} results from {}",
        content.results.len(),
        path.display()
    );

    Ok(content.results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use woundm_core::confidence::ConfidenceScorer;
    use woundm_core::result::ImageRef;
    use woundm_core::tracking::TrackingQuality;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}-{}.wmr", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_save_and_load() {
        let confidence = ConfidenceScorer::default().evaluate(
            TrackingQuality::Normal,
            Some(0.2),
            Some(0.005),
        );
        let results = vec![
            MeasurementResult::spatial(
                10.0,
                3.8,
                Some(29.83),
                Some(confidence),
                Some(ImageRef::new("capture/0001.jpg")),
            ),
            MeasurementResult::manual(5.0, 2.0, 0.785),
        ];

        let path = temp_path("roundtrip");
        save_results(&results, &path).unwrap();
        let loaded = load_results(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, results);
    }

    #[test]
    fn test_invalid_magic() {
        let path = temp_path("bad-magic");
        std::fs::write(&path, b"NOPE000000000000").unwrap();
        let err = load_results(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, FileError::InvalidFormat(_)));
    }

    #[test]
    fn test_newer_version_rejected() {
        let path = temp_path("future");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let err = load_results(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, FileError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_truncated_archive_rejected() {
        let path = temp_path("truncated");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        std::fs::write(&path, &bytes).unwrap();

        let err = load_results(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, FileError::InvalidFormat(_)));
    }
}
