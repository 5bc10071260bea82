//! 打包资源容器（NXPK）访问模块
//!
//! 游戏资源以单个打包文件分发，条目按路径哈希寻址，可选 zlib 压缩。
//!
//! # 文件布局
//!
//! ```text
//! magic "NXPK" | version u32 | count u32 | reserved u32
//! count × { hash u64 | flags u32 | size u32 | stored_size u32 }
//! count × stored bytes（按条目顺序紧密排列）
//! ```

mod entry;

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use memmap2::Mmap;

use crate::datatypes::{read_u32, read_u64, write_u32, write_u64, EntryFlags};
use crate::hash::{fnv1a_64_str, EMPTY_HASH};
use crate::io::{RecordStore, StoreKey};
use crate::utils::EditorError;

pub use entry::PackEntry;

/// 文件魔数
pub const PACK_MAGIC: &[u8; 4] = b"NXPK";
/// 当前格式版本
pub const PACK_VERSION: u32 = 1;

const HEADER_SIZE: usize = 16;
const TABLE_ENTRY_SIZE: usize = 20;

/// 打包容器
///
/// 读取时一次性解析条目表，条目数据在第一次 `get` 时解压；
/// 写出时未修改的条目保持原始存储字节不变。
#[derive(Debug, Clone, Default)]
pub struct PackArchive {
    entries: Vec<PackEntry>,
}

impl PackArchive {
    /// 创建空容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开打包文件
    ///
    /// # 参数
    /// - `path`: 打包文件路径
    ///
    /// # 返回
    /// - 成功：返回 `PackArchive`
    /// - 失败：返回 `EditorError::IoError` 或 `EditorError::InvalidPack`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        // 使用内存映射文件（零拷贝读取条目表）
        let file = std::fs::File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };

        let archive = Self::from_bytes(&mmap[..])?;
        log::debug!("打开打包文件 {}: {} 个条目", path.as_ref().display(), archive.len());
        Ok(archive)
    }

    /// 从内存字节解析
    pub fn from_bytes(data: &[u8]) -> Result<Self, EditorError> {
        if data.len() < HEADER_SIZE {
            return Err(EditorError::InvalidPack("文件太短，无法包含头部".to_string()));
        }
        if &data[..4] != PACK_MAGIC {
            return Err(EditorError::InvalidPack(format!(
                "Expected NXPK, found {}",
                String::from_utf8_lossy(&data[..4])
            )));
        }

        let mut cursor = Cursor::new(data);
        cursor.set_position(4);
        let version = read_u32(&mut cursor)?;
        if version != PACK_VERSION {
            return Err(EditorError::InvalidPack(format!("不支持的版本: {}", version)));
        }
        let count = read_u32(&mut cursor)? as usize;
        let _reserved = read_u32(&mut cursor)?;

        let table_end = count
            .checked_mul(TABLE_ENTRY_SIZE)
            .and_then(|size| size.checked_add(HEADER_SIZE))
            .filter(|end| *end <= data.len())
            .ok_or_else(|| EditorError::InvalidPack(format!("条目数量异常: {}", count)))?;

        let mut table = Vec::with_capacity(count);
        for _ in 0..count {
            let hash = read_u64(&mut cursor)?;
            let flags = EntryFlags::from_bits_truncate(read_u32(&mut cursor)?);
            let size = read_u32(&mut cursor)?;
            let stored_size = read_u32(&mut cursor)? as usize;
            table.push((hash, flags, size, stored_size));
        }

        let mut seen = HashSet::with_capacity(count);
        let mut offset = table_end;
        let mut entries = Vec::with_capacity(count);
        for (hash, flags, size, stored_size) in table {
            if hash == EMPTY_HASH {
                return Err(EditorError::InvalidPack("条目使用了哨兵哈希".to_string()));
            }
            if !seen.insert(hash) {
                return Err(EditorError::InvalidPack(format!("重复的条目哈希: {:016X}", hash)));
            }

            let end = offset
                .checked_add(stored_size)
                .filter(|end| *end <= data.len())
                .ok_or_else(|| {
                    EditorError::InvalidPack(format!(
                        "Insufficient data for entry {:016X}: expected {} bytes",
                        hash, stored_size
                    ))
                })?;

            entries.push(PackEntry::from_stored(hash, flags, size, data[offset..end].to_vec()));
            offset = end;
        }

        if offset != data.len() {
            return Err(EditorError::InvalidPack(format!(
                "文件末尾有 {} 字节无法识别的数据",
                data.len() - offset
            )));
        }

        Ok(Self { entries })
    }

    /// 序列化为字节
    pub fn to_bytes(&self) -> Result<Vec<u8>, EditorError> {
        let blobs = self
            .entries
            .iter()
            .map(|e| e.stored_bytes())
            .collect::<Result<Vec<_>, _>>()?;

        let mut output = Vec::with_capacity(
            HEADER_SIZE
                + self.entries.len() * TABLE_ENTRY_SIZE
                + blobs.iter().map(|b| b.len()).sum::<usize>(),
        );
        output.extend_from_slice(PACK_MAGIC);
        write_u32(&mut output, PACK_VERSION)?;
        write_u32(&mut output, Self::to_u32(self.entries.len())?)?;
        write_u32(&mut output, 0)?;

        for (entry, blob) in self.entries.iter().zip(&blobs) {
            write_u64(&mut output, entry.hash)?;
            write_u32(&mut output, entry.flags.bits())?;
            write_u32(&mut output, Self::to_u32(entry.size())?)?;
            write_u32(&mut output, Self::to_u32(blob.len())?)?;
        }

        for blob in &blobs {
            output.extend_from_slice(blob);
        }

        Ok(output)
    }

    /// 写入文件
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        let output = self.to_bytes()?;

        // 确保父目录存在
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path.as_ref(), output)?;
        Ok(())
    }

    /// 追加条目（按路径）
    pub fn insert_path(&mut self, path: &str, data: Vec<u8>, compressed: bool) -> Result<usize, EditorError> {
        self.insert_hash(fnv1a_64_str(path), data, compressed)
    }

    /// 追加条目（按哈希）
    pub fn insert_hash(&mut self, hash: u64, data: Vec<u8>, compressed: bool) -> Result<usize, EditorError> {
        StoreKey::Hash(hash).ensure_not_sentinel()?;
        if self.index_of_hash(hash).is_some() {
            return Err(EditorError::InvalidPack(format!("重复的条目哈希: {:016X}", hash)));
        }

        self.entries.push(PackEntry::new(hash, data, compressed)?);
        Ok(self.entries.len() - 1)
    }

    /// 按完整路径查找条目索引
    pub fn index_of_path(&self, path: &str) -> Option<usize> {
        self.index_of_hash(fnv1a_64_str(path))
    }

    /// 按哈希查找条目索引
    pub fn index_of_hash(&self, hash: u64) -> Option<usize> {
        if hash == EMPTY_HASH {
            return None;
        }
        self.entries.iter().position(|e| e.hash == hash)
    }

    /// 所有条目
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    /// 已修改的条目数量
    pub fn modified_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_modified()).count()
    }

    fn resolve(&self, key: &StoreKey) -> Result<usize, EditorError> {
        key.ensure_not_sentinel()?;

        let found = match key {
            StoreKey::Index(index) => Some(*index).filter(|i| *i < self.entries.len()),
            StoreKey::Path(path) => self.index_of_path(path),
            StoreKey::Hash(hash) => self.index_of_hash(*hash),
        };

        found.ok_or_else(|| EditorError::KeyNotFound(key.to_string()))
    }

    fn to_u32(value: usize) -> Result<u32, EditorError> {
        u32::try_from(value)
            .map_err(|_| EditorError::Serialization(format!("大小超出 u32 范围: {}", value)))
    }
}

impl RecordStore for PackArchive {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &StoreKey) -> Result<Vec<u8>, EditorError> {
        let index = self.resolve(key)?;
        Ok(self.entries[index].data()?.to_vec())
    }

    fn set(&mut self, key: &StoreKey, bytes: Vec<u8>) -> Result<(), EditorError> {
        let index = self.resolve(key)?;
        self.entries[index].replace(bytes);
        Ok(())
    }

    fn keys(&self) -> Vec<StoreKey> {
        self.entries.iter().map(|e| StoreKey::Hash(e.hash)).collect()
    }
}
