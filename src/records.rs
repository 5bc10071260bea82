//! 类型化游戏记录模块
//!
//! 每种记录都实现 [`BinaryRecord`](crate::io::BinaryRecord) 以便与打包容器中的字节互转，
//! 并派生 serde 以便在控制台中以 JSON 查看和编辑。
//!
//! - **personal**: 个体数据表（物种/形态元数据）
//! - **trainer**: 训练家数据
//! - **encounter**: 定点遭遇与赠送遭遇
//! - **throw_param**: 投掷参数（哈希键字典条目）

// 为根记录实现 RecordTable（需在子模块声明之前定义）
macro_rules! impl_record_table {
    ($root:ty, $entry:ty) => {
        impl $crate::records::RecordTable for $root {
            type Entry = $entry;

            fn entries(&self) -> &[$entry] {
                &self.table
            }

            fn entries_mut(&mut self) -> &mut Vec<$entry> {
                &mut self.table
            }
        }
    };
}

pub mod personal;
pub mod trainer;
pub mod encounter;
pub mod throw_param;

pub use personal::{PersonalInfo, PersonalTable};
pub use trainer::{MoveSlot, TrainerData, TrainerPoke};
pub use encounter::{EncounterSlot, GiftEncounter, GiftEncounterArchive, StaticEncounter, StaticEncounterArchive};
pub use throw_param::{ThrowParam, ThrowParamTable, ThrowParamType};

/// 固定取值常量（游戏在运行时解析的"随机"占位值）
pub mod fixed {
    /// 性别随机
    pub const GENDER_RANDOM: u8 = 3;
    /// 性格随机
    pub const NATURE_RANDOM: u8 = 25;
    /// 闪光锁定：随机
    pub const SHINY_LOCK_RANDOM: u8 = 0;
    /// 身高/体重随机
    pub const SIZE_RANDOM: i16 = -1;
}

/// 以数组为主体的根记录
///
/// 打包容器中的许多文件只有一个根对象，其内容是某种条目的数组。
pub trait RecordTable {
    type Entry;

    /// 条目数组
    fn entries(&self) -> &[Self::Entry];

    /// 可变条目数组
    fn entries_mut(&mut self) -> &mut Vec<Self::Entry>;
}
