//! 显示标签
//!
//! 字符串表只用于列表中的显示名称，每行一个条目，行号即编号。
//! 文件为 UTF-8，或带 BOM 的 UTF-16LE。

use std::path::Path;

use crate::hash::HashKey;
use crate::records::{GiftEncounter, StaticEncounter};
use crate::utils::EditorError;

/// 按编号索引的字符串表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    lines: Vec<String>,
}

impl LabelTable {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(&bytes))
    }

    /// 解码字节并按行拆分
    ///
    /// 按 BOM 判断编码，没有 BOM 时视为 UTF-8；无法解码的字节替换为 U+FFFD。
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if had_errors {
            log::warn!("字符串表包含无法以 {} 解码的字节", encoding.name());
        }

        let lines = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// 编号对应的名称；超出范围时返回编号本身
    pub fn name(&self, index: usize) -> String {
        match self.get(index) {
            Some(name) => name.to_string(),
            None => format!("#{}", index),
        }
    }
}

/// 物种显示名称：形态 0 为 `"Name"`，否则为 `"Name-form"`
pub fn species_label(names: &LabelTable, species: u16, form: u8) -> String {
    let name = names.name(species as usize);
    if form == 0 {
        name
    } else {
        format!("{}-{}", name, form)
    }
}

/// 哈希键显示为 16 位大写十六进制
pub fn hash_label(hash: u64) -> String {
    HashKey(hash).to_string()
}

/// 定点遭遇：以第一只宝可梦命名
pub fn static_encounter_label(names: &LabelTable, encounter: &StaticEncounter) -> String {
    match encounter.table.first() {
        Some(slot) => format!("{} @ Lv. {}", species_label(names, slot.species, slot.form), slot.level),
        None => "No Entries".to_string(),
    }
}

/// 赠送遭遇
pub fn gift_label(names: &LabelTable, gift: &GiftEncounter) -> String {
    format!("{} @ Lv. {}", species_label(names, gift.species, gift.form), gift.level)
}
