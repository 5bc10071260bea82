//! 物种编号常量与合法性列表

/// 物种编号上限（含）
pub const MAX_SPECIES: u16 = 905;

pub const GROWLITHE: u16 = 58;
pub const ARCANINE: u16 = 59;
pub const VOLTORB: u16 = 100;
pub const ELECTRODE: u16 = 101;
pub const TYPHLOSION: u16 = 157;
pub const QWILFISH: u16 = 211;
pub const ARCEUS: u16 = 493;
pub const SAMUROTT: u16 = 503;
pub const LILLIGANT: u16 = 549;
pub const BASCULIN: u16 = 550;
pub const ZORUA: u16 = 570;
pub const ZOROARK: u16 = 571;
pub const BRAVIARY: u16 = 628;
pub const SLIGGOO: u16 = 705;
pub const GOODRA: u16 = 706;
pub const AVALUGG: u16 = 713;
pub const DECIDUEYE: u16 = 724;
pub const KLEAVOR: u16 = 900;

/// 传说与幻之宝可梦
pub const LEGENDARY: &[u16] = &[
    480, 481, 482, // Uxie, Mesprit, Azelf
    483, 484, // Dialga, Palkia
    485, 486, 487, 488, 489, 490, 491, 492, // Heatran ..= Shaymin
    ARCEUS,
    641, 642, 645, // Tornadus, Thundurus, Landorus
    905, // Enamorus
];

/// 只在战斗中出现形态的物种
pub const BATTLE_EXCLUSIVE_FORMS: &[u16] = &[
    351, // Castform
    421, // Cherrim
    555, // Darmanitan
    648, // Meloetta
    681, // Aegislash
    716, // Xerneas
    718, // Zygarde
    746, // Wishiwashi
    774, // Minior
    778, // Mimikyu
    875, // Eiscue
    877, // Morpeko
    888, // Zacian
    889, // Zamazenta
    890, // Eternatus
];

/// 合体形态的物种
pub const BATTLE_FUSIONS: &[u16] = &[
    646, // Kyurem
    800, // Necrozma
    898, // Calyrex
];

/// 定点遭遇中的头目战
pub const FIXED_BOSSES: &[u16] = &[KLEAVOR, LILLIGANT, ARCANINE, ELECTRODE, AVALUGG, ARCEUS];

pub fn is_legendary(species: u16) -> bool {
    LEGENDARY.contains(&species)
}

pub fn is_fixed_boss(species: u16) -> bool {
    FIXED_BOSSES.contains(&species)
}

/// 形态只在战斗中切换（随机形态时整体排除）
pub fn has_battle_only_forms(species: u16) -> bool {
    BATTLE_EXCLUSIVE_FORMS.contains(&species) || BATTLE_FUSIONS.contains(&species)
}
