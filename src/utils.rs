use thiserror::Error;
use std::path::{Path, PathBuf};

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Record index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Store key not found: {0}")]
    KeyNotFound(String),

    #[error("Sentinel hash 0xCBF29CE484222645 cannot address a record")]
    SentinelKey,

    #[error("Invalid pack format: {0}")]
    InvalidPack(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Presenter error: {0}")]
    Presenter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 创建文件备份
///
/// 备份文件名形如 `data.trpak.2024-01-01-12-00-00.bak`，与原文件同目录。
pub fn create_backup(file_path: &Path) -> Result<PathBuf, EditorError> {
    if !file_path.exists() {
        return Err(EditorError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!("{}.{}.bak", ext, timestamp))
        .unwrap_or_else(|| format!("{}.bak", timestamp));
    let backup_path = file_path.with_extension(extension);

    std::fs::copy(file_path, &backup_path)
        .map_err(EditorError::IoError)?;

    Ok(backup_path)
}

/// 检查外部解压库是否存在
///
/// 缺失时只记录警告，不中断启动；依赖该库的操作可能在实际调用时失败。
pub fn check_external_library(dir: &Path, file_name: &str) -> bool {
    let path = dir.join(file_name);
    if path.exists() {
        return true;
    }

    log::warn!(
        "{} 未在 {} 中找到，部分解压功能可能出错",
        file_name,
        dir.display()
    );
    false
}
