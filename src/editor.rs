/// 编辑器层模块
///
/// 该模块提供事务式的记录编辑接口。
/// 遵循"修改-保存分离"原则，所有修改操作仅在内存中进行，
/// 由会话结果决定整体提交或整体丢弃。
///
/// # 架构设计
///
/// - **cache**: 记录缓存，按需加载并追踪修改
/// - **presenter**: 展示层 trait 及无界面/控制台实现
/// - **session**: 编辑会话，提交/丢弃策略
///
/// # 使用示例
///
/// ```rust,ignore
/// use nx_record_editor::editor::{AutoPresenter, EditSession, RecordCache};
/// use nx_record_editor::io::{BinarySerializer, FolderStore};
///
/// let mut store = FolderStore::open("romfs/bin/trainer", Some("bin"))?;
/// let serializer = BinarySerializer::<TrainerData>::new();
/// let mut cache = RecordCache::from_whole_store(&mut store, &serializer)?;
/// let labels = cache.key_labels();
///
/// let mut presenter = AutoPresenter::apply();
/// let outcome = EditSession::new("Trainers", &mut presenter).run(&mut cache, &labels, Some(mutator))?;
/// ```
pub mod cache;
pub mod presenter;
pub mod session;

// === 导出公共接口 ===
pub use cache::{CacheEntry, RecordCache};
pub use presenter::{AutoPresenter, ConsolePresenter, Mutator, Presenter};
pub use session::{EditSession, SessionOutcome};
