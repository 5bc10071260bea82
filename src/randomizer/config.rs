//! 随机化配置
//!
//! 配置以 JSON 文件保存，缺失字段取默认值。

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::species::MAX_SPECIES;
use crate::utils::EditorError;

/// 物种替换设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesSettings {
    /// 不替换为传说宝可梦
    pub exclude_legendaries: bool,
    /// 不替换为定点头目
    pub exclude_fixed_bosses: bool,
    /// 额外禁用的物种，与计算得到的禁用列表合并
    pub species_banlist_override: Vec<u16>,
    /// 物种编号上限
    pub max_species: u16,
}

impl Default for SpeciesSettings {
    fn default() -> Self {
        Self {
            exclude_legendaries: false,
            exclude_fixed_bosses: false,
            species_banlist_override: Vec::new(),
            max_species: MAX_SPECIES,
        }
    }
}

impl SpeciesSettings {
    /// 遭遇随机化使用的设置：总是排除传说
    pub fn without_legendaries(&self) -> Self {
        Self { exclude_legendaries: true, ..self.clone() }
    }
}

/// 替换物种后重置字段的策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationPolicy {
    /// 闪光概率（`0..=100` 中抽到小于此值）
    pub shiny_percent: u8,
    /// 头目概率
    pub alpha_percent: u8,
    /// 清空招式
    pub reset_moves: bool,
    /// 清空后的招式标记为已精通
    pub master_moves: bool,
    /// 定点遭遇的固定个体值
    pub fixed_iv: u8,
    /// 定点遭遇的固定努力等级
    pub fixed_gv: u8,
    /// 赠送球种范围 `ball_min..ball_max`
    pub ball_min: u8,
    pub ball_max: u8,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            shiny_percent: 3,
            alpha_percent: 3,
            reset_moves: true,
            master_moves: true,
            fixed_iv: 31,
            fixed_gv: 10,
            ball_min: 27, // Strange
            ball_max: 37, // Origin 之后
        }
    }
}

impl MutationPolicy {
    fn validate(&self) -> Result<(), EditorError> {
        if self.ball_min >= self.ball_max {
            return Err(EditorError::Config(format!(
                "球种范围为空: {}..{}",
                self.ball_min, self.ball_max
            )));
        }
        if self.shiny_percent > 101 || self.alpha_percent > 101 {
            return Err(EditorError::Config("概率必须在 0..=101 之间".to_string()));
        }
        Ok(())
    }
}

/// 随机化配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerConfig {
    /// 随机种子；未指定时使用系统熵
    pub seed: Option<u64>,
    pub species: SpeciesSettings,
    pub policy: MutationPolicy,
}

impl RandomizerConfig {
    /// 从 JSON 文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: RandomizerConfig = serde_json::from_str(&text)?;
        config.policy.validate()?;
        Ok(config)
    }

    /// 保存为 JSON 文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// 创建随机数生成器
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
