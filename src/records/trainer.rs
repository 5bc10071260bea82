use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};

use crate::datatypes::{
    read_bool, read_u16, read_u32, read_u64, read_u8, write_bool, write_u16, write_u32, write_u64,
    write_u8,
};
use crate::hash::HashKey;
use crate::io::{read_array, write_array, BinaryRecord};
use crate::utils::EditorError;

use super::fixed;

/// 招式槽
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: u16,
    /// 是否已精通
    pub mastered: bool,
}

impl MoveSlot {
    /// 清空的槽位（由游戏按等级自动填充）
    pub fn cleared(mastered: bool) -> Self {
        Self { move_id: 0, mastered }
    }
}

impl BinaryRecord for MoveSlot {
    const MIN_SIZE: usize = 3;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { move_id: read_u16(cursor)?, mastered: read_bool(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u16(writer, self.move_id)?;
        write_bool(writer, self.mastered)?;
        Ok(())
    }
}

/// 训练家队伍成员
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerPoke {
    pub species: u16,
    pub form: u8,
    pub level: u8,
    pub gender: u8,
    pub nature: u8,
    pub moves: [MoveSlot; 4],
    pub shiny: bool,
    /// 头目个体
    pub is_alpha: bool,
}

impl TrainerPoke {
    pub fn new(species: u16, form: u8, level: u8) -> Self {
        Self {
            species,
            form,
            level,
            gender: fixed::GENDER_RANDOM,
            nature: fixed::NATURE_RANDOM,
            moves: [MoveSlot::default(); 4],
            shiny: false,
            is_alpha: false,
        }
    }
}

impl BinaryRecord for TrainerPoke {
    const MIN_SIZE: usize = 20;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        let species = read_u16(cursor)?;
        let form = read_u8(cursor)?;
        let level = read_u8(cursor)?;
        let gender = read_u8(cursor)?;
        let nature = read_u8(cursor)?;

        let mut moves = [MoveSlot::default(); 4];
        for slot in moves.iter_mut() {
            *slot = MoveSlot::read_from(cursor)?;
        }

        Ok(Self {
            species,
            form,
            level,
            gender,
            nature,
            moves,
            shiny: read_bool(cursor)?,
            is_alpha: read_bool(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u16(writer, self.species)?;
        write_u8(writer, self.form)?;
        write_u8(writer, self.level)?;
        write_u8(writer, self.gender)?;
        write_u8(writer, self.nature)?;
        for slot in &self.moves {
            slot.write_to(writer)?;
        }
        write_bool(writer, self.shiny)?;
        write_bool(writer, self.is_alpha)?;
        Ok(())
    }
}

/// 训练家数据（每个训练家一个文件）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerData {
    pub trainer_hash: HashKey,
    pub trainer_class: HashKey,
    pub ai_flags: u32,
    pub team: Vec<TrainerPoke>,
}

impl BinaryRecord for TrainerData {
    const MIN_SIZE: usize = 24;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self {
            trainer_hash: HashKey(read_u64(cursor)?),
            trainer_class: HashKey(read_u64(cursor)?),
            ai_flags: read_u32(cursor)?,
            team: read_array(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u64(writer, self.trainer_hash.0)?;
        write_u64(writer, self.trainer_class.0)?;
        write_u32(writer, self.ai_flags)?;
        write_array(writer, &self.team)
    }
}
