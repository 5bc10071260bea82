use rand::seq::SliceRandom;
use rand::Rng;

use super::banlist::Banlist;
use super::config::SpeciesSettings;
use super::forms::SpeciesFormTable;
use super::species::{is_fixed_boss, is_legendary};
use crate::records::PersonalTable;

/// 物种/形态替换引擎
///
/// 每次随机化开始时由当前个体数据表重新构建，不做持久化。
/// 随机数生成器由调用方传入，固定种子即可得到确定的结果。
#[derive(Debug, Clone)]
pub struct SubstitutionEngine {
    banlist: Banlist,
    forms: SpeciesFormTable,
    pool: Vec<u16>,
}

impl SubstitutionEngine {
    pub fn new(personal: &PersonalTable, settings: &SpeciesSettings) -> Self {
        let banlist =
            Banlist::build(personal).with_overrides(settings.species_banlist_override.iter().copied());
        let forms = SpeciesFormTable::build(personal);

        let pool: Vec<u16> = (1..=settings.max_species)
            .filter(|&species| !banlist.contains(species))
            .filter(|&species| !(settings.exclude_legendaries && is_legendary(species)))
            .filter(|&species| !(settings.exclude_fixed_bosses && is_fixed_boss(species)))
            .collect();

        if pool.is_empty() {
            log::warn!("可选物种为空，随机化将保留原物种（即使原物种已被禁用或排除）");
        } else {
            log::debug!("可选物种 {} 个，禁用 {} 个", pool.len(), banlist.banned().len());
        }

        Self { banlist, forms, pool }
    }

    pub fn banlist(&self) -> &Banlist {
        &self.banlist
    }

    pub fn forms(&self) -> &SpeciesFormTable {
        &self.forms
    }

    /// 可选物种（升序）
    pub fn pool(&self) -> &[u16] {
        &self.pool
    }

    pub fn is_allowed(&self, species: u16) -> bool {
        self.pool.binary_search(&species).is_ok()
    }

    /// 在可选物种中均匀抽取替换物种
    ///
    /// 可选物种非空时，结果一定不在禁用列表中，也不属于被排除的类别。
    /// 可选物种为空时原样返回 `current`，不做任何检查，因此可能返回禁用或被排除的物种；
    /// 需要区分这种情况的调用方应先检查 [`pool`](Self::pool) 是否为空。
    pub fn random_species<R: Rng + ?Sized>(&self, current: u16, rng: &mut R) -> u16 {
        self.pool.choose(rng).copied().unwrap_or(current)
    }

    /// 为给定物种抽取形态
    pub fn random_form<R: Rng + ?Sized>(&self, species: u16, rng: &mut R) -> u8 {
        self.forms.random_form(species, rng)
    }

    /// 替换物种，并按新物种抽取形态
    pub fn substitute<R: Rng + ?Sized>(&self, current: u16, rng: &mut R) -> (u16, u8) {
        let species = self.random_species(current, rng);
        (species, self.random_form(species, rng))
    }
}
