/// IO 抽象层模块
///
/// 该模块提供了记录序列化与记录存储的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换 IO 实现（如内存存储、目录存储、打包容器等）。
///
/// # 架构设计
///
/// - **traits**: 定义 RecordSerializer/RecordStore trait 接口
/// - **binary**: 二进制记录编解码
/// - **json**: JSON 序列化器
/// - **memory_store**: 内存存储
/// - **folder_store**: 目录存储
///
/// # 使用示例
///
/// ```rust,ignore
/// use nx_record_editor::io::{FolderStore, RecordStore, StoreKey};
///
/// let store = FolderStore::open("romfs/bin/trainer", Some("bin"))?;
/// let data = store.get(&StoreKey::Index(0))?;
/// ```
pub mod traits;
pub mod binary;
pub mod json;
pub mod memory_store;
pub mod folder_store;

// === 导出 trait 定义 ===
pub use traits::{RecordSerializer, RecordStore, StoreKey};
pub use binary::{read_array, write_array, BinaryRecord, BinarySerializer};

// === 导出默认实现 ===
pub use json::JsonSerializer;
pub use memory_store::MemoryStore;
pub use folder_store::FolderStore;
