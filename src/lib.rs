pub mod datatypes;
pub mod hash;
pub mod io;
pub mod pack;
pub mod records;
pub mod editor;
pub mod randomizer;
pub mod labels;
pub mod utils;

// 重新导出主要结构
pub use editor::{AutoPresenter, ConsolePresenter, EditSession, Mutator, Presenter, RecordCache, SessionOutcome};
pub use hash::{fnv1a_64_str, HashKey, EMPTY_HASH};
pub use io::{RecordSerializer, RecordStore, StoreKey};
pub use pack::PackArchive;
pub use randomizer::{RandomizerConfig, SubstitutionEngine};
pub use utils::{check_external_library, create_backup, EditorError};

// 常量定义
pub const SUPPORTED_EXTENSIONS: &[&str] = &["trpak", "pak"];

/// 解压打包文件所需的外部库
pub const OODLE_LIBRARY: &str = "oo2core_8_win64.dll";
