//! 物种随机化模块
//!
//! - **species**: 物种编号常量与传说/头目/战斗形态列表
//! - **banlist**: 由个体数据表计算的禁用物种
//! - **forms**: 物种形态表与固定形态覆盖表
//! - **engine**: 物种/形态替换引擎
//! - **config**: 随机化配置（JSON）
//! - **mutation**: 训练家、定点遭遇、赠送遭遇的批量修改

pub mod species;
pub mod banlist;
pub mod forms;
pub mod engine;
pub mod config;
pub mod mutation;

pub use banlist::Banlist;
pub use config::{MutationPolicy, RandomizerConfig, SpeciesSettings};
pub use engine::SubstitutionEngine;
pub use forms::{form_override, SpeciesFormTable, FORM_OVERRIDES};
pub use mutation::{randomize_gifts, randomize_static_encounters, randomize_trainers};
