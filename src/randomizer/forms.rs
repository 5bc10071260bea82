use std::collections::HashMap;

use rand::Rng;

use super::species::*;
use crate::records::PersonalTable;

/// 固定形态覆盖表：物种 -> 形态索引
///
/// 这些物种的随机形态总是返回表中的值，与有效形态数量无关。
pub const FORM_OVERRIDES: &[(u16, u8)] = &[
    (GROWLITHE, 1),
    (ARCANINE, 1),
    (VOLTORB, 1),
    (ELECTRODE, 1),
    (TYPHLOSION, 1),
    (QWILFISH, 1),
    (SAMUROTT, 1),
    (LILLIGANT, 1),
    (ZORUA, 1),
    (ZOROARK, 1),
    (BRAVIARY, 1),
    (SLIGGOO, 1),
    (GOODRA, 1),
    (AVALUGG, 1),
    (DECIDUEYE, 1),
    (BASCULIN, 2),
    (KLEAVOR, 0),
];

/// 覆盖表中的固定形态
pub fn form_override(species: u16) -> Option<u8> {
    FORM_OVERRIDES.iter().find(|(s, _)| *s == species).map(|(_, form)| *form)
}

/// 物种 -> 游戏内可获得形态列表
///
/// 只在战斗中切换形态或合体的物种整体不进入此表，
/// 标记为仅战斗出现的单个形态也被排除。
#[derive(Debug, Clone, Default)]
pub struct SpeciesFormTable {
    forms: HashMap<u16, Vec<u8>>,
}

impl SpeciesFormTable {
    pub fn build(personal: &PersonalTable) -> Self {
        let mut forms: HashMap<u16, Vec<u8>> = HashMap::new();
        for info in personal.iter() {
            if info.is_present_in_game() && !info.is_battle_only() && !has_battle_only_forms(info.species) {
                forms.entry(info.species).or_default().push(info.form);
            }
        }
        Self { forms }
    }

    /// 有效形态列表
    pub fn forms(&self, species: u16) -> Option<&[u8]> {
        self.forms.get(&species).map(Vec::as_slice)
    }

    /// 有效形态数量（无条目为 0）
    pub fn form_count(&self, species: u16) -> usize {
        self.forms(species).map_or(0, <[u8]>::len)
    }

    /// 随机形态
    ///
    /// 无条目时返回 0；覆盖表中的物种返回固定值；其余在 `0..count` 中均匀抽取。
    pub fn random_form<R: Rng + ?Sized>(&self, species: u16, rng: &mut R) -> u8 {
        let count = self.form_count(species);
        if count == 0 {
            return 0;
        }

        match form_override(species) {
            Some(form) => form,
            None => u8::try_from(rng.gen_range(0..count)).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::PersonalFlags;
    use crate::records::PersonalInfo;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> PersonalTable {
        PersonalTable::new(vec![
            PersonalInfo::new(GROWLITHE, 0, true),
            PersonalInfo::new(GROWLITHE, 1, true),
            PersonalInfo::new(LILLIGANT, 0, true),
            PersonalInfo::new(201, 0, true),
            PersonalInfo::new(201, 1, true),
            PersonalInfo::new(201, 2, true),
            PersonalInfo::new(201, 3, false),
            PersonalInfo::new(646, 0, true),
        ])
    }

    #[test]
    fn test_table_filters() {
        let forms = SpeciesFormTable::build(&table());
        assert_eq!(forms.forms(201), Some(&[0u8, 1, 2][..]));
        assert_eq!(forms.form_count(646), 0);
        assert_eq!(forms.form_count(999), 0);
    }

    #[test]
    fn test_battle_only_entry_excluded() {
        let mut battle_form = PersonalInfo::new(25, 1, true);
        battle_form.flags |= PersonalFlags::BATTLE_ONLY.bits();
        let table = PersonalTable::new(vec![PersonalInfo::new(25, 0, true), battle_form]);

        let forms = SpeciesFormTable::build(&table);
        assert_eq!(forms.forms(25), Some(&[0u8][..]));

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(forms.random_form(25, &mut rng), 0);
        }
    }

    #[test]
    fn test_overrides_ignore_seed() {
        let forms = SpeciesFormTable::build(&table());
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(forms.random_form(GROWLITHE, &mut rng), 1);
            // 只有一个有效形态，仍然返回覆盖值
            assert_eq!(forms.random_form(LILLIGANT, &mut rng), 1);
        }
    }

    #[test]
    fn test_missing_species_gets_form_zero() {
        let forms = SpeciesFormTable::build(&table());
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(forms.random_form(BASCULIN, &mut rng), 0);
        assert_eq!(forms.random_form(646, &mut rng), 0);
    }

    #[test]
    fn test_uniform_draw_stays_in_range() {
        let forms = SpeciesFormTable::build(&table());
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let form = forms.random_form(201, &mut rng) as usize;
            assert!(form < 3);
            seen[form] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_override_lookup() {
        assert_eq!(form_override(BASCULIN), Some(2));
        assert_eq!(form_override(KLEAVOR), Some(0));
        assert_eq!(form_override(25), None);
        assert_eq!(FORM_OVERRIDES.iter().filter(|(_, f)| *f == 1).count(), 15);
    }
}
