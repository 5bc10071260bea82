//! 批量修改
//!
//! 每条记录先替换物种，再按**新**物种抽取形态，然后按策略重置
//! 与物种相关的字段（招式、性别、闪光、个体值等）。

use rand::Rng;

use super::config::MutationPolicy;
use super::engine::SubstitutionEngine;
use super::species::{is_fixed_boss, is_legendary};
use crate::editor::RecordCache;
use crate::records::{fixed, EncounterSlot, GiftEncounter, MoveSlot, StaticEncounter, TrainerData, TrainerPoke};
use crate::utils::EditorError;

/// 按百分比掷骰（在 `0..=100` 中抽到小于 `percent`）
pub fn roll_percent<R: Rng + ?Sized>(rng: &mut R, percent: u8) -> bool {
    rng.gen_range(0..=100u8) < percent
}

/// 定点遭遇中不参与随机化的物种（头目战与传说）
pub fn is_protected_encounter(species: u16) -> bool {
    is_fixed_boss(species) || is_legendary(species)
}

fn randomize_poke<R: Rng + ?Sized>(
    poke: &mut TrainerPoke,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) {
    let (species, form) = engine.substitute(poke.species, rng);
    poke.species = species;
    poke.form = form;
    poke.gender = fixed::GENDER_RANDOM;
    poke.nature = fixed::NATURE_RANDOM;
    if policy.reset_moves {
        poke.moves = [MoveSlot::cleared(policy.master_moves); 4];
    }
    poke.shiny = roll_percent(rng, policy.shiny_percent);
    poke.is_alpha = roll_percent(rng, policy.alpha_percent);
}

fn randomize_slot<R: Rng + ?Sized>(
    slot: &mut EncounterSlot,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) {
    let (species, form) = engine.substitute(slot.species, rng);
    slot.species = species;
    slot.form = form;
    slot.nature = fixed::NATURE_RANDOM;
    slot.gender = fixed::GENDER_RANDOM;
    slot.shiny_lock = fixed::SHINY_LOCK_RANDOM;
    if policy.reset_moves {
        slot.moves = [0; 4];
        slot.mastered = [policy.master_moves; 4];
    }
    slot.ivs = [policy.fixed_iv; 6];
    slot.gvs = [policy.fixed_gv; 6];
    slot.height = fixed::SIZE_RANDOM;
    slot.weight = fixed::SIZE_RANDOM;
}

fn randomize_gift<R: Rng + ?Sized>(
    gift: &mut GiftEncounter,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) {
    let (species, form) = engine.substitute(gift.species, rng);
    gift.species = species;
    gift.form = form;
    gift.nature = fixed::NATURE_RANDOM;
    gift.gender = fixed::GENDER_RANDOM;
    gift.shiny_lock = fixed::SHINY_LOCK_RANDOM;
    gift.ball = if policy.ball_min < policy.ball_max {
        rng.gen_range(policy.ball_min..policy.ball_max)
    } else {
        policy.ball_min
    };
    if policy.reset_moves {
        gift.moves = [0; 4];
    }
    gift.height = fixed::SIZE_RANDOM;
    gift.weight = fixed::SIZE_RANDOM;
}

/// 随机化所有训练家的队伍
///
/// # 返回
/// 被替换的宝可梦数量
pub fn randomize_trainers<R: Rng + ?Sized>(
    cache: &mut RecordCache<'_, TrainerData>,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) -> Result<usize, EditorError> {
    let mut changed = 0;
    for index in 0..cache.len() {
        let trainer = cache.get_mut(index)?;
        for poke in trainer.team.iter_mut() {
            randomize_poke(poke, engine, policy, rng);
            changed += 1;
        }
    }

    log::info!("随机化 {} 个训练家，共 {} 只宝可梦", cache.len(), changed);
    Ok(changed)
}

/// 随机化定点遭遇
///
/// 没有槽位的遭遇被跳过；头目战与传说宝可梦保持不变。
pub fn randomize_static_encounters<R: Rng + ?Sized>(
    cache: &mut RecordCache<'_, StaticEncounter>,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) -> Result<usize, EditorError> {
    let mut changed = 0;
    for index in 0..cache.len() {
        if cache.get(index)?.table.is_empty() {
            continue;
        }

        let encounter = cache.get_mut(index)?;
        for slot in encounter.table.iter_mut() {
            if is_protected_encounter(slot.species) {
                continue;
            }
            randomize_slot(slot, engine, policy, rng);
            changed += 1;
        }
    }

    log::info!("随机化定点遭遇 {} 处", changed);
    Ok(changed)
}

/// 随机化赠送遭遇
pub fn randomize_gifts<R: Rng + ?Sized>(
    cache: &mut RecordCache<'_, GiftEncounter>,
    engine: &SubstitutionEngine,
    policy: &MutationPolicy,
    rng: &mut R,
) -> Result<usize, EditorError> {
    for index in 0..cache.len() {
        randomize_gift(cache.get_mut(index)?, engine, policy, rng);
    }

    log::info!("随机化赠送遭遇 {} 处", cache.len());
    Ok(cache.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomizer::config::SpeciesSettings;
    use crate::randomizer::species::{ARCEUS, KLEAVOR};
    use crate::records::PersonalInfo;
    use crate::records::PersonalTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> SubstitutionEngine {
        let personal = PersonalTable::new(vec![
            PersonalInfo::new(10, 0, true),
            PersonalInfo::new(10, 1, true),
            PersonalInfo::new(11, 0, true),
        ]);
        SubstitutionEngine::new(&personal, &SpeciesSettings::default())
    }

    #[test]
    fn test_trainer_fields_reset() {
        let mut poke = TrainerPoke::new(1, 0, 30);
        poke.moves[0].move_id = 33;
        let trainer = TrainerData {
            trainer_hash: crate::hash::HashKey(1),
            trainer_class: crate::hash::HashKey(2),
            ai_flags: 0,
            team: vec![poke],
        };
        let mut cache = RecordCache::from_vec(vec![trainer]);
        let mut rng = StdRng::seed_from_u64(5);

        let policy = MutationPolicy { shiny_percent: 101, alpha_percent: 0, ..Default::default() };
        assert_eq!(randomize_trainers(&mut cache, &engine(), &policy, &mut rng).unwrap(), 1);

        let poke = &cache.get(0).unwrap().team[0];
        assert!(poke.species == 10 || poke.species == 11);
        assert_eq!(poke.level, 30);
        assert!(poke.shiny);
        assert!(!poke.is_alpha);
        assert!(poke.moves.iter().all(|m| m.move_id == 0 && m.mastered));
    }

    #[test]
    fn test_static_protects_bosses_and_legendaries() {
        let encounters = vec![
            StaticEncounter {
                encounter_name: "boss".to_string(),
                table: vec![EncounterSlot::new(KLEAVOR, 0, 18), EncounterSlot::new(ARCEUS, 0, 75)],
            },
            StaticEncounter { encounter_name: "empty".to_string(), table: vec![] },
            StaticEncounter { encounter_name: "wild".to_string(), table: vec![EncounterSlot::new(1, 0, 5)] },
        ];
        let mut cache = RecordCache::from_vec(encounters);
        let mut rng = StdRng::seed_from_u64(5);

        let changed =
            randomize_static_encounters(&mut cache, &engine(), &MutationPolicy::default(), &mut rng).unwrap();
        assert_eq!(changed, 1);
        assert!(!cache.is_dirty(0));
        assert!(!cache.is_dirty(1));

        let slot = &cache.get(2).unwrap().table[0];
        assert_eq!(slot.ivs, [31; 6]);
        assert_eq!(slot.gvs, [10; 6]);
        assert!(slot.mastered.iter().all(|m| *m));
    }

    #[test]
    fn test_gift_ball_range() {
        let gifts = (0..50).map(|_| GiftEncounter::new(1, 0, 5, 4)).collect();
        let mut cache = RecordCache::from_vec(gifts);
        let mut rng = StdRng::seed_from_u64(8);

        randomize_gifts(&mut cache, &engine(), &MutationPolicy::default(), &mut rng).unwrap();
        for i in 0..cache.len() {
            let gift = cache.get(i).unwrap();
            assert!((27..37).contains(&gift.ball));
            assert_eq!(gift.height, -1);
        }
    }

    #[test]
    fn test_form_follows_new_species() {
        let engine = engine();
        let gifts = (0..100).map(|_| GiftEncounter::new(10, 1, 5, 27)).collect();
        let mut cache = RecordCache::from_vec(gifts);
        let mut rng = StdRng::seed_from_u64(21);

        randomize_gifts(&mut cache, &engine, &MutationPolicy::default(), &mut rng).unwrap();
        for i in 0..cache.len() {
            let gift = cache.get(i).unwrap();
            assert!((gift.form as usize) < engine.forms().form_count(gift.species));
        }
    }
}
