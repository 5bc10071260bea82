//! 内存记录存储

use super::traits::{RecordStore, StoreKey};
use crate::hash::fnv1a_64_str;
use crate::utils::EditorError;

/// 内存中的存储条目
#[derive(Debug, Clone)]
struct MemoryEntry {
    path: Option<String>,
    hash: Option<u64>,
    data: Vec<u8>,
}

/// 基于内存的记录存储
///
/// 主要用于测试和从其他容器临时拆出的条目集合。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<MemoryEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由无名缓冲区列表创建（只能按索引寻址）
    pub fn from_buffers(buffers: Vec<Vec<u8>>) -> Self {
        let entries = buffers
            .into_iter()
            .map(|data| MemoryEntry { path: None, hash: None, data })
            .collect();
        Self { entries }
    }

    /// 追加带路径的条目
    pub fn push_path(&mut self, path: impl Into<String>, data: Vec<u8>) -> Result<usize, EditorError> {
        let path = path.into();
        let key = StoreKey::Path(path.clone());
        key.ensure_not_sentinel()?;

        self.entries.push(MemoryEntry { hash: key.hash(), path: Some(path), data });
        Ok(self.entries.len() - 1)
    }

    /// 追加只有哈希的条目
    pub fn push_hash(&mut self, hash: u64, data: Vec<u8>) -> Result<usize, EditorError> {
        StoreKey::Hash(hash).ensure_not_sentinel()?;

        self.entries.push(MemoryEntry { path: None, hash: Some(hash), data });
        Ok(self.entries.len() - 1)
    }

    /// 获取所有条目的快照
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.entries.iter().map(|e| e.data.clone()).collect()
    }

    fn resolve(&self, key: &StoreKey) -> Result<usize, EditorError> {
        key.ensure_not_sentinel()?;

        match key {
            StoreKey::Index(index) if *index < self.entries.len() => Ok(*index),
            StoreKey::Index(_) => Err(EditorError::KeyNotFound(key.to_string())),
            StoreKey::Path(path) => {
                let hash = fnv1a_64_str(path);
                self.entries
                    .iter()
                    .position(|e| e.hash == Some(hash))
                    .ok_or_else(|| EditorError::KeyNotFound(key.to_string()))
            }
            StoreKey::Hash(hash) => self
                .entries
                .iter()
                .position(|e| e.hash == Some(*hash))
                .ok_or_else(|| EditorError::KeyNotFound(key.to_string())),
        }
    }
}

impl RecordStore for MemoryStore {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &StoreKey) -> Result<Vec<u8>, EditorError> {
        let index = self.resolve(key)?;
        Ok(self.entries[index].data.clone())
    }

    fn set(&mut self, key: &StoreKey, bytes: Vec<u8>) -> Result<(), EditorError> {
        let index = self.resolve(key)?;
        self.entries[index].data = bytes;
        Ok(())
    }

    fn keys(&self) -> Vec<StoreKey> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| match (&e.path, e.hash) {
                (Some(path), _) => StoreKey::Path(path.clone()),
                (None, Some(hash)) => StoreKey::Hash(hash),
                (None, None) => StoreKey::Index(index),
            })
            .collect()
    }
}
