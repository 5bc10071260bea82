use std::borrow::Cow;
use std::cell::OnceCell;
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::datatypes::EntryFlags;
use crate::utils::EditorError;

/// 打包容器中的单个条目
///
/// 打开容器时只保存存储字节，第一次读取数据时才解压并校验大小；
/// 损坏的条目只会让读取它的操作失败。
#[derive(Debug, Clone)]
pub struct PackEntry {
    /// 路径哈希
    pub hash: u64,
    /// 标志位
    pub flags: EntryFlags,
    /// 条目表中记录的解压大小
    size: u32,
    /// 原始存储字节（压缩条目为压缩后的数据）
    stored: Vec<u8>,
    /// 解压结果缓存
    decoded: OnceCell<Vec<u8>>,
    /// 替换后的数据（存在即视为已修改）
    replacement: Option<Vec<u8>>,
}

impl PackEntry {
    /// 从存储字节创建条目（不解压）
    pub(crate) fn from_stored(hash: u64, flags: EntryFlags, size: u32, stored: Vec<u8>) -> Self {
        Self { hash, flags, size, stored, decoded: OnceCell::new(), replacement: None }
    }

    /// 创建新条目
    pub fn new(hash: u64, data: Vec<u8>, compressed: bool) -> Result<Self, EditorError> {
        let size = u32::try_from(data.len())
            .map_err(|_| EditorError::Serialization(format!("条目过大: {} bytes", data.len())))?;

        if compressed {
            let stored = Self::compress_data(&data)?;
            Ok(Self {
                hash,
                flags: EntryFlags::COMPRESSED,
                size,
                stored,
                decoded: OnceCell::from(data),
                replacement: None,
            })
        } else {
            Ok(Self::from_stored(hash, EntryFlags::empty(), size, data))
        }
    }

    /// 解压后的数据
    ///
    /// 压缩条目在第一次调用时解压，结果被缓存。
    pub fn data(&self) -> Result<&[u8], EditorError> {
        if let Some(data) = &self.replacement {
            return Ok(data);
        }

        if !self.is_compressed() {
            if self.stored.len() != self.size as usize {
                return Err(EditorError::InvalidPack(format!(
                    "条目 {:016X} 大小不匹配: 期望 {} bytes，实际 {} bytes",
                    self.hash,
                    self.size,
                    self.stored.len()
                )));
            }
            return Ok(&self.stored);
        }

        if let Some(data) = self.decoded.get() {
            return Ok(data);
        }
        let data = Self::decompress_data(&self.stored, self.size)?;
        log::debug!("解压条目 {:016X}: {} -> {} bytes", self.hash, self.stored.len(), data.len());
        Ok(self.decoded.get_or_init(|| data))
    }

    /// 解压后的大小（不触发解压）
    pub fn size(&self) -> usize {
        match &self.replacement {
            Some(data) => data.len(),
            None => self.size as usize,
        }
    }

    /// 存储字节的大小
    pub fn stored_size(&self) -> usize {
        self.stored.len()
    }

    /// 是否已被修改
    pub fn is_modified(&self) -> bool {
        self.replacement.is_some()
    }

    /// 是否为压缩条目
    pub fn is_compressed(&self) -> bool {
        self.flags.contains(EntryFlags::COMPRESSED)
    }

    /// 替换数据并标记为已修改
    pub fn replace(&mut self, data: Vec<u8>) {
        self.replacement = Some(data);
    }

    /// 需要写出的存储字节
    ///
    /// 未修改的条目直接借用原始字节（损坏的条目也原样写回）；修改过的压缩条目重新压缩。
    pub(crate) fn stored_bytes(&self) -> Result<Cow<'_, [u8]>, EditorError> {
        let Some(data) = &self.replacement else {
            return Ok(Cow::Borrowed(self.stored.as_slice()));
        };

        if self.is_compressed() {
            let compressed = Self::compress_data(data)?;
            log::debug!(
                "重新压缩条目 {:016X}: 解压大小 {} -> 压缩大小 {}",
                self.hash,
                data.len(),
                compressed.len()
            );
            Ok(Cow::Owned(compressed))
        } else {
            Ok(Cow::Borrowed(data.as_slice()))
        }
    }

    /// 解压缩数据
    ///
    /// 最多读取 `expected_size + 1` 字节，超出即判定为大小不匹配。
    fn decompress_data(data: &[u8], expected_size: u32) -> Result<Vec<u8>, EditorError> {
        if data.is_empty() {
            return Err(EditorError::CompressionError("没有压缩数据".to_string()));
        }

        let mut decompressed = Vec::new();
        ZlibDecoder::new(data)
            .take(u64::from(expected_size) + 1)
            .read_to_end(&mut decompressed)
            .map_err(|e| EditorError::CompressionError(e.to_string()))?;

        if decompressed.len() != expected_size as usize {
            return Err(EditorError::CompressionError(format!(
                "解压大小不匹配: 期望 {} bytes，实际 {} bytes",
                expected_size,
                decompressed.len()
            )));
        }

        Ok(decompressed)
    }

    /// 压缩数据
    fn compress_data(data: &[u8]) -> Result<Vec<u8>, EditorError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| EditorError::CompressionError(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| EditorError::CompressionError(e.to_string()))
    }
}
