use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};

use crate::datatypes::{read_u16, read_u8, write_u16, write_u8, PersonalFlags};
use crate::io::{read_array, write_array, BinaryRecord};
use crate::utils::EditorError;

/// 个体数据条目（一个物种的一个形态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    /// 模型物种编号（同一物种的所有形态共用）
    pub species: u16,
    /// 形态编号
    pub form: u8,
    /// 标志位（原始值，见 [`PersonalFlags`]）
    pub flags: u8,
    /// 种族值 HP/攻击/防御/特攻/特防/速度
    pub base_stats: [u8; 6],
    /// 属性
    pub types: [u8; 2],
    /// 性别比例
    pub gender_ratio: u8,
    /// 图鉴编号
    pub dex_index: u16,
}

impl PersonalInfo {
    /// 创建只含物种/形态/是否可获得的条目
    pub fn new(species: u16, form: u8, present_in_game: bool) -> Self {
        let flags = if present_in_game { PersonalFlags::PRESENT_IN_GAME } else { PersonalFlags::empty() };
        Self {
            species,
            form,
            flags: flags.bits(),
            base_stats: [0; 6],
            types: [0; 2],
            gender_ratio: 0,
            dex_index: 0,
        }
    }

    /// 获取标志位
    pub fn get_flags(&self) -> PersonalFlags {
        PersonalFlags::from_bits_truncate(self.flags)
    }

    /// 是否在游戏内可获得
    pub fn is_present_in_game(&self) -> bool {
        self.get_flags().contains(PersonalFlags::PRESENT_IN_GAME)
    }

    /// 是否为仅在战斗中出现的形态
    pub fn is_battle_only(&self) -> bool {
        self.get_flags().contains(PersonalFlags::BATTLE_ONLY)
    }
}

impl BinaryRecord for PersonalInfo {
    const MIN_SIZE: usize = 15;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        let species = read_u16(cursor)?;
        let form = read_u8(cursor)?;
        let flags = read_u8(cursor)?;

        let mut base_stats = [0u8; 6];
        for stat in base_stats.iter_mut() {
            *stat = read_u8(cursor)?;
        }
        let types = [read_u8(cursor)?, read_u8(cursor)?];

        Ok(Self {
            species,
            form,
            flags,
            base_stats,
            types,
            gender_ratio: read_u8(cursor)?,
            dex_index: read_u16(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u16(writer, self.species)?;
        write_u8(writer, self.form)?;
        write_u8(writer, self.flags)?;
        for stat in self.base_stats {
            write_u8(writer, stat)?;
        }
        for t in self.types {
            write_u8(writer, t)?;
        }
        write_u8(writer, self.gender_ratio)?;
        write_u16(writer, self.dex_index)?;
        Ok(())
    }
}

/// 个体数据表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalTable {
    pub table: Vec<PersonalInfo>,
}

impl PersonalTable {
    pub fn new(table: Vec<PersonalInfo>) -> Self {
        Self { table }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalInfo> {
        self.table.iter()
    }
}

impl BinaryRecord for PersonalTable {
    const MIN_SIZE: usize = 4;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { table: read_array(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_array(writer, &self.table)
    }
}

impl_record_table!(PersonalTable, PersonalInfo);
