use std::collections::HashSet;

use crate::records::PersonalTable;

/// 物种禁用列表
///
/// 个体数据表中没有任何"游戏内可获得"条目的物种被禁用。
/// 表中完全没有出现的物种同样视为禁用。
#[derive(Debug, Clone, Default)]
pub struct Banlist {
    banned: HashSet<u16>,
    known: HashSet<u16>,
}

impl Banlist {
    /// 按表顺序扫描个体数据
    ///
    /// 某物种的一个条目可获得时将其移出禁用列表，此后不会再被加入，
    /// 即使后续条目不可获得。
    pub fn build(personal: &PersonalTable) -> Self {
        let mut banned = HashSet::new();
        let mut has_form = HashSet::new();
        let mut known = HashSet::new();

        for info in personal.iter() {
            known.insert(info.species);
            if info.is_present_in_game() {
                banned.remove(&info.species);
                has_form.insert(info.species);
            } else if !has_form.contains(&info.species) {
                banned.insert(info.species);
            }
        }

        Self { banned, known }
    }

    /// 合并额外的禁用物种
    pub fn with_overrides<I: IntoIterator<Item = u16>>(mut self, overrides: I) -> Self {
        self.banned.extend(overrides);
        self
    }

    /// 物种是否禁用
    pub fn contains(&self, species: u16) -> bool {
        self.banned.contains(&species) || !self.known.contains(&species)
    }

    /// 显式禁用的物种（已排序）
    pub fn banned(&self) -> Vec<u16> {
        let mut banned: Vec<u16> = self.banned.iter().copied().collect();
        banned.sort_unstable();
        banned
    }
}
