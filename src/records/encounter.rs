use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};

use crate::datatypes::{
    read_bool, read_i16, read_string, read_u16, read_u8, write_bool, write_i16, write_string,
    write_u16, write_u8,
};
use crate::io::{read_array, write_array, BinaryRecord};
use crate::utils::EditorError;

use super::fixed;

/// 定点遭遇中的一只宝可梦
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSlot {
    pub species: u16,
    pub form: u8,
    pub level: u8,
    pub nature: u8,
    pub gender: u8,
    pub shiny_lock: u8,
    pub moves: [u16; 4],
    pub mastered: [bool; 4],
    pub ivs: [u8; 6],
    /// 努力等级
    pub gvs: [u8; 6],
    pub height: i16,
    pub weight: i16,
}

impl EncounterSlot {
    pub fn new(species: u16, form: u8, level: u8) -> Self {
        Self {
            species,
            form,
            level,
            nature: fixed::NATURE_RANDOM,
            gender: fixed::GENDER_RANDOM,
            shiny_lock: fixed::SHINY_LOCK_RANDOM,
            moves: [0; 4],
            mastered: [false; 4],
            ivs: [0; 6],
            gvs: [0; 6],
            height: fixed::SIZE_RANDOM,
            weight: fixed::SIZE_RANDOM,
        }
    }
}

impl BinaryRecord for EncounterSlot {
    const MIN_SIZE: usize = 35;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        let species = read_u16(cursor)?;
        let form = read_u8(cursor)?;
        let level = read_u8(cursor)?;
        let nature = read_u8(cursor)?;
        let gender = read_u8(cursor)?;
        let shiny_lock = read_u8(cursor)?;

        let mut moves = [0u16; 4];
        for m in moves.iter_mut() {
            *m = read_u16(cursor)?;
        }
        let mut mastered = [false; 4];
        for m in mastered.iter_mut() {
            *m = read_bool(cursor)?;
        }
        let mut ivs = [0u8; 6];
        for iv in ivs.iter_mut() {
            *iv = read_u8(cursor)?;
        }
        let mut gvs = [0u8; 6];
        for gv in gvs.iter_mut() {
            *gv = read_u8(cursor)?;
        }

        Ok(Self {
            species,
            form,
            level,
            nature,
            gender,
            shiny_lock,
            moves,
            mastered,
            ivs,
            gvs,
            height: read_i16(cursor)?,
            weight: read_i16(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u16(writer, self.species)?;
        write_u8(writer, self.form)?;
        write_u8(writer, self.level)?;
        write_u8(writer, self.nature)?;
        write_u8(writer, self.gender)?;
        write_u8(writer, self.shiny_lock)?;
        for m in self.moves {
            write_u16(writer, m)?;
        }
        for m in self.mastered {
            write_bool(writer, m)?;
        }
        for iv in self.ivs {
            write_u8(writer, iv)?;
        }
        for gv in self.gvs {
            write_u8(writer, gv)?;
        }
        write_i16(writer, self.height)?;
        write_i16(writer, self.weight)?;
        Ok(())
    }
}

/// 定点遭遇
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEncounter {
    pub encounter_name: String,
    pub table: Vec<EncounterSlot>,
}

impl BinaryRecord for StaticEncounter {
    const MIN_SIZE: usize = 6;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { encounter_name: read_string(cursor)?, table: read_array(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_string(writer, &self.encounter_name)?;
        write_array(writer, &self.table)
    }
}

/// 定点遭遇文件根
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEncounterArchive {
    pub table: Vec<StaticEncounter>,
}

impl BinaryRecord for StaticEncounterArchive {
    const MIN_SIZE: usize = 4;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { table: read_array(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_array(writer, &self.table)
    }
}

impl_record_table!(StaticEncounterArchive, StaticEncounter);

/// 赠送遭遇
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftEncounter {
    pub species: u16,
    pub form: u8,
    pub level: u8,
    pub nature: u8,
    pub gender: u8,
    pub shiny_lock: u8,
    pub ball: u8,
    pub moves: [u16; 4],
    pub height: i16,
    pub weight: i16,
}

impl GiftEncounter {
    pub fn new(species: u16, form: u8, level: u8, ball: u8) -> Self {
        Self {
            species,
            form,
            level,
            nature: fixed::NATURE_RANDOM,
            gender: fixed::GENDER_RANDOM,
            shiny_lock: fixed::SHINY_LOCK_RANDOM,
            ball,
            moves: [0; 4],
            height: fixed::SIZE_RANDOM,
            weight: fixed::SIZE_RANDOM,
        }
    }
}

impl BinaryRecord for GiftEncounter {
    const MIN_SIZE: usize = 20;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        let species = read_u16(cursor)?;
        let form = read_u8(cursor)?;
        let level = read_u8(cursor)?;
        let nature = read_u8(cursor)?;
        let gender = read_u8(cursor)?;
        let shiny_lock = read_u8(cursor)?;
        let ball = read_u8(cursor)?;

        let mut moves = [0u16; 4];
        for m in moves.iter_mut() {
            *m = read_u16(cursor)?;
        }

        Ok(Self {
            species,
            form,
            level,
            nature,
            gender,
            shiny_lock,
            ball,
            moves,
            height: read_i16(cursor)?,
            weight: read_i16(cursor)?,
        })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_u16(writer, self.species)?;
        write_u8(writer, self.form)?;
        write_u8(writer, self.level)?;
        write_u8(writer, self.nature)?;
        write_u8(writer, self.gender)?;
        write_u8(writer, self.shiny_lock)?;
        write_u8(writer, self.ball)?;
        for m in self.moves {
            write_u16(writer, m)?;
        }
        write_i16(writer, self.height)?;
        write_i16(writer, self.weight)?;
        Ok(())
    }
}

/// 赠送遭遇文件根
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftEncounterArchive {
    pub table: Vec<GiftEncounter>,
}

impl BinaryRecord for GiftEncounterArchive {
    const MIN_SIZE: usize = 4;

    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
        Ok(Self { table: read_array(cursor)? })
    }

    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
        write_array(writer, &self.table)
    }
}

impl_record_table!(GiftEncounterArchive, GiftEncounter);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BinarySerializer, RecordSerializer};

    #[test]
    fn test_slot_and_gift_sizes() {
        let slot = BinarySerializer::new().serialize(&EncounterSlot::new(900, 0, 30)).unwrap();
        assert_eq!(slot.len(), EncounterSlot::MIN_SIZE);

        let gift = BinarySerializer::new().serialize(&GiftEncounter::new(722, 0, 5, 27)).unwrap();
        assert_eq!(gift.len(), GiftEncounter::MIN_SIZE);
    }

    #[test]
    fn test_static_archive_bytes_are_stable() {
        let archive = StaticEncounterArchive {
            table: vec![
                StaticEncounter {
                    encounter_name: "ev_kleavor".to_string(),
                    table: vec![EncounterSlot::new(900, 0, 18)],
                },
                StaticEncounter { encounter_name: String::new(), table: vec![] },
            ],
        };

        let serializer = BinarySerializer::<StaticEncounterArchive>::new();
        let bytes = serializer.serialize(&archive).unwrap();
        let parsed = serializer.deserialize(&bytes).unwrap();
        assert_eq!(parsed, archive);
        assert_eq!(serializer.serialize(&parsed).unwrap(), bytes);
    }

    #[test]
    fn test_negative_size_survives() {
        let serializer = BinarySerializer::<GiftEncounter>::new();
        let bytes = serializer.serialize(&GiftEncounter::new(1, 0, 5, 30)).unwrap();
        assert_eq!(&bytes[16..], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(serializer.deserialize(&bytes).unwrap().height, -1);
    }
}
