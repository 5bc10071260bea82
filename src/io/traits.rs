//! IO 抽象层 - trait 定义
//!
//! 该模块定义了记录序列化与记录存储的抽象接口，支持依赖注入和测试 mock。
//! 缓存与编辑会话只依赖这些接口，不关心底层是文件夹、内存还是打包容器。

use std::fmt;

use crate::hash::{fnv1a_64_str, EMPTY_HASH};
use crate::utils::EditorError;

/// 记录序列化 trait
///
/// # 职责
/// - 在原始字节与类型化记录之间转换
/// - 对任何由 `serialize` 产生的字节 `b`，必须满足
///   `serialize(deserialize(b)) == b`（逐字节相等）
pub trait RecordSerializer<T> {
    /// 反序列化；数据损坏时返回 `EditorError::Deserialization`
    fn deserialize(&self, bytes: &[u8]) -> Result<T, EditorError>;

    /// 序列化
    fn serialize(&self, value: &T) -> Result<Vec<u8>, EditorError>;
}

/// 存储键
///
/// 支持按位置索引、路径或预先计算的 64 位哈希寻址。
/// 路径键通过 FNV-1a 哈希解析，因此空路径等价于哨兵哈希。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// 从零开始的位置索引
    Index(usize),
    /// 路径字符串
    Path(String),
    /// 预先计算的哈希
    Hash(u64),
}

impl StoreKey {
    /// 创建路径键
    pub fn path(path: impl Into<String>) -> Self {
        StoreKey::Path(path.into())
    }

    /// 获取键对应的哈希（索引键没有哈希）
    pub fn hash(&self) -> Option<u64> {
        match self {
            StoreKey::Index(_) => None,
            StoreKey::Path(path) => Some(fnv1a_64_str(path)),
            StoreKey::Hash(hash) => Some(*hash),
        }
    }

    /// 拒绝哨兵哈希
    ///
    /// 哨兵哈希表示"无条目"，任何存储都不能用它寻址记录。
    pub fn ensure_not_sentinel(&self) -> Result<(), EditorError> {
        if self.hash() == Some(EMPTY_HASH) {
            return Err(EditorError::SentinelKey);
        }
        Ok(())
    }

    /// 用于显示的短名称（路径取文件名主干）
    pub fn display_name(&self) -> String {
        match self {
            StoreKey::Index(index) => index.to_string(),
            StoreKey::Path(path) => std::path::Path::new(path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(path)
                .to_string(),
            StoreKey::Hash(hash) => format!("{:016X}", hash),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Index(index) => write!(f, "#{}", index),
            StoreKey::Path(path) => write!(f, "{}", path),
            StoreKey::Hash(hash) => write!(f, "0x{:016X}", hash),
        }
    }
}

/// 记录存储 trait
///
/// # 职责
/// - 以键读取/替换字节缓冲区
/// - 不负责解析，仅负责存取
///
/// 存储假定同一时间只有一个写入者，不提供版本戳；
/// 后写入者会静默覆盖先前的内容。
pub trait RecordStore {
    /// 条目数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 读取键对应的字节
    fn get(&self, key: &StoreKey) -> Result<Vec<u8>, EditorError>;

    /// 替换键对应的字节
    fn set(&mut self, key: &StoreKey, bytes: Vec<u8>) -> Result<(), EditorError>;

    /// 按存储顺序列出所有条目的键
    ///
    /// 有路径的条目返回路径键，否则返回哈希键或索引键。
    fn keys(&self) -> Vec<StoreKey>;
}
