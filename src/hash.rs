//! 64 位 FNV-1a 哈希
//!
//! 游戏资源使用的变体，偏移基数为 `0xCBF29CE484222645`，
//! 因此空字符串的哈希恰好等于偏移基数，即 [`EMPTY_HASH`]。

use std::fmt;

/// 偏移基数
const OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2645;
/// FNV 质数
const PRIME: u64 = 0x0000_0100_0000_01B3;

/// 空字符串的哈希，表示"无条目"
pub const EMPTY_HASH: u64 = OFFSET_BASIS;

/// 计算字节序列的 FNV-1a 哈希
pub fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(OFFSET_BASIS, |hash, &b| (hash ^ b as u64).wrapping_mul(PRIME))
}

/// 计算字符串的 FNV-1a 哈希
pub fn fnv1a_64_str(text: &str) -> u64 {
    fnv1a_64(text.as_bytes())
}

/// 字典式条目的 64 位键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HashKey(pub u64);

impl HashKey {
    /// 表示"无条目"的键
    pub const NONE: HashKey = HashKey(EMPTY_HASH);

    /// 由名称计算键
    pub fn from_name(name: &str) -> Self {
        HashKey(fnv1a_64_str(name))
    }

    /// 是否为哨兵值
    pub fn is_none(&self) -> bool {
        self.0 == EMPTY_HASH
    }

    /// 非哨兵时返回原值
    pub fn get(&self) -> Option<u64> {
        if self.is_none() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl Default for HashKey {
    fn default() -> Self {
        HashKey::NONE
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}
