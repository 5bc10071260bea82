//! 投掷参数
//!
//! 字典式条目：每一项由 64 位哈希键标识，类型字段同样是哈希，
//! 取值为 [`ThrowParamType`] 中的已知常量之一。

use std::fmt;
use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};

use crate::datatypes::{read_f32, read_u64, write_f32, write_u64};
use crate::hash::{HashKey, EMPTY_HASH};
use crate::io::{read_array, write_array, BinaryRecord};
use crate::utils::EditorError;

/// 投掷类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ThrowParamType {
    Wing = 0x6B96_27EC_F526_25DA,
    SnowCalm = 0xA086_F618_4744_1D29,
    Default = 0xAFC4_D6C0_5ABE_F19E,
    VolcanoCalm = 0xC82A_786B_A9E1_C8AE,
    Stealth = 0xE9BD_C448_876B_25DC,
    MyPokeball = 0x1F99_AB6E_3577_86DB,
    None = EMPTY_HASH,
}

impl ThrowParamType {
    pub const ALL: [ThrowParamType; 7] = [
        ThrowParamType::Wing,
        ThrowParamType::SnowCalm,
        ThrowParamType::Default,
        ThrowParamType::VolcanoCalm,
        ThrowParamType::Stealth,
        ThrowParamType::MyPokeball,
        ThrowParamType::None,
    ];

    /// 由哈希值查找已知类型
    pub fn from_hash(hash: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.hash() == hash)
    }

    pub fn hash(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            ThrowParamType::Wing => "Wing",
            ThrowParamType::SnowCalm => "SnowCalm",
            ThrowParamType::Default => "Default",
            ThrowParamType::VolcanoCalm => "VolcanoCalm",
            ThrowParamType::Stealth => "Stealth",
            ThrowParamType::MyPokeball => "MyPokeball",
            ThrowParamType::None => "None",
        }
    }
}

impl fmt::Display for ThrowParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 投掷参数条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowParam {
    pub hash: HashKey,
    pub kind: HashKey,
    pub speed: f32,
    pub angle: f32,
    pub gravity: f32,
}

impl ThrowParam {
    /// 已知类型（未知哈希返回 `None`）
    pub fn kind_type(&self) -> Option<ThrowParamType> {
        ThrowParamType::from_hash(self.kind.0)
    }

    /// 列表中显示的名称
    pub fn label(&self) -> String {
        match self.kind_type() {
            Some(kind) => format!("{} ({})", self.hash, kind),
            None => format!("{} ({})", self.hash, self.kind),
        }
    }
}

impl BinaryRecord for ThrowParam {
    const MIN_SIZE: usize = 28;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self {
            hash: HashKey(read_u64(cursor)?),
            kind: HashKey(read_u64(cursor)?),
            speed: read_f32(cursor)?,
            angle: read_f32(cursor)?,
            gravity: read_f32(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u64(writer, self.hash.0)?;
        write_u64(writer, self.kind.0)?;
        write_f32(writer, self.speed)?;
        write_f32(writer, self.angle)?;
        write_f32(writer, self.gravity)?;
        Ok(())
    }
}

/// 投掷参数表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThrowParamTable {
    pub table: Vec<ThrowParam>,
}

impl ThrowParamTable {
    /// 按键查找条目；哨兵键永远找不到
    pub fn find(&self, key: HashKey) -> Option<&ThrowParam> {
        if key.is_none() {
            return None;
        }
        self.table.iter().find(|p| p.hash == key)
    }
}

impl BinaryRecord for ThrowParamTable {
    const MIN_SIZE: usize = 4;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { table: read_array(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_array(writer, &self.table)
    }
}

impl_record_table!(ThrowParamTable, ThrowParam);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BinarySerializer, RecordSerializer};

    #[test]
    fn test_none_type_is_sentinel() {
        assert_eq!(ThrowParamType::None.hash(), EMPTY_HASH);
        assert_eq!(ThrowParamType::from_hash(EMPTY_HASH), Some(ThrowParamType::None));
        assert_eq!(ThrowParamType::from_hash(0x6B96_27EC_F526_25DA), Some(ThrowParamType::Wing));
        assert_eq!(ThrowParamType::from_hash(1), None);
    }

    #[test]
    fn test_find_skips_sentinel() {
        let table = ThrowParamTable {
            table: vec![ThrowParam {
                hash: HashKey::NONE,
                kind: HashKey(ThrowParamType::None.hash()),
                speed: 0.0,
                angle: 0.0,
                gravity: 0.0,
            }],
        };
        assert!(table.find(HashKey::NONE).is_none());
    }

    #[test]
    fn test_label_and_bytes() {
        let param = ThrowParam {
            hash: HashKey(0x10),
            kind: HashKey(ThrowParamType::Stealth.hash()),
            speed: 12.5,
            angle: 30.0,
            gravity: -9.8,
        };
        assert_eq!(param.label(), "0000000000000010 (Stealth)");

        let serializer = BinarySerializer::<ThrowParam>::new();
        let bytes = serializer.serialize(&param).unwrap();
        assert_eq!(bytes.len(), ThrowParam::MIN_SIZE);
        assert_eq!(serializer.deserialize(&bytes).unwrap(), param);
    }
}
