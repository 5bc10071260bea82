//! 文件夹记录存储
//!
//! 提供基于文件系统目录的默认存储实现，每个文件即一个记录。

use std::collections::HashSet;
use std::path::PathBuf;

use super::traits::{RecordStore, StoreKey};
use crate::hash::fnv1a_64_str;
use crate::utils::{create_backup, EditorError};

/// 基于目录的记录存储（基于 std::fs）
///
/// 条目按文件名排序，键为相对文件名。读取和写入都直接访问磁盘。
/// 启用备份后，每个文件在本存储中第一次被覆盖前会先复制一份 `.bak`。
#[derive(Debug, Clone)]
pub struct FolderStore {
    /// 根目录
    root: PathBuf,
    /// 相对文件名（已排序）
    files: Vec<String>,
    /// 覆盖前是否备份
    backup: bool,
    /// 已备份的文件索引
    backed_up: HashSet<usize>,
}

impl FolderStore {
    /// 打开目录
    ///
    /// # 参数
    /// * `root` - 记录目录
    /// * `extension` - 可选扩展名过滤（不区分大小写，不含点）
    pub fn open(root: impl Into<PathBuf>, extension: Option<&str>) -> Result<Self, EditorError> {
        let root = root.into();
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            if let Some(wanted) = extension {
                let matches = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case(wanted))
                    .unwrap_or(false);
                if !matches {
                    continue;
                }
            }

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }

        files.sort();
        log::debug!("打开目录 {}: {} 个记录文件", root.display(), files.len());

        Ok(Self { root, files, backup: false, backed_up: HashSet::new() })
    }

    /// 覆盖文件前先创建备份
    pub fn with_backup(mut self) -> Self {
        self.backup = true;
        self
    }

    fn resolve(&self, key: &StoreKey) -> Result<usize, EditorError> {
        key.ensure_not_sentinel()?;

        let found = match key {
            StoreKey::Index(index) => Some(*index).filter(|i| *i < self.files.len()),
            StoreKey::Path(path) => self.files.iter().position(|f| f == path),
            StoreKey::Hash(hash) => self.files.iter().position(|f| fnv1a_64_str(f) == *hash),
        };

        found.ok_or_else(|| EditorError::KeyNotFound(key.to_string()))
    }
}

impl RecordStore for FolderStore {
    fn len(&self) -> usize {
        self.files.len()
    }

    fn get(&self, key: &StoreKey) -> Result<Vec<u8>, EditorError> {
        let index = self.resolve(key)?;
        Ok(std::fs::read(self.root.join(&self.files[index]))?)
    }

    fn set(&mut self, key: &StoreKey, bytes: Vec<u8>) -> Result<(), EditorError> {
        let index = self.resolve(key)?;
        let path = self.root.join(&self.files[index]);

        if self.backup && !self.backed_up.contains(&index) {
            let backup = create_backup(&path)?;
            log::info!("已备份到 {}", backup.display());
            self.backed_up.insert(index);
        }

        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn keys(&self) -> Vec<StoreKey> {
        self.files.iter().cloned().map(StoreKey::Path).collect()
    }
}
