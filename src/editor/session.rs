/// 编辑会话模块
///
/// 一次编辑会话把记录交给展示层，并根据展示层给出的唯一布尔结果决定
/// 提交（`save`）还是整体丢弃（`cancel_edits`）。没有字段级回滚。

use std::mem;

use super::cache::RecordCache;
use super::presenter::{Mutator, Presenter};
use crate::io::{RecordSerializer, RecordStore, StoreKey};
use crate::records::RecordTable;
use crate::utils::EditorError;

/// 会话结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 已提交，`written` 为写回的条目数
    Committed { written: usize },
    /// 已丢弃
    Discarded,
}

impl SessionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SessionOutcome::Committed { .. })
    }
}

/// 编辑会话
///
/// # 使用示例
///
/// ```rust,ignore
/// let mut presenter = AutoPresenter::apply();
/// let mut session = EditSession::new("Trainers", &mut presenter);
/// let outcome = session.run(&mut cache, &labels, Some(mutator))?;
/// ```
pub struct EditSession<'p, T> {
    title: String,
    presenter: &'p mut dyn Presenter<T>,
}

impl<'p, T: Clone + PartialEq> EditSession<'p, T> {
    pub fn new(title: impl Into<String>, presenter: &'p mut dyn Presenter<T>) -> Self {
        Self { title: title.into(), presenter }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 运行一次会话
    ///
    /// - 展示层返回 `false`：调用 `cancel_edits`，不会写入存储
    /// - 展示层返回 `true`：调用 `save`
    /// - 展示层出错：先丢弃全部修改，再返回错误
    ///
    /// `save` 失败时错误原样返回，缓存保留修改标记，调用方可以重试 `save`。
    pub fn run(
        &mut self,
        cache: &mut RecordCache<'_, T>,
        labels: &[String],
        mutator: Option<Mutator<'_, T>>,
    ) -> Result<SessionOutcome, EditorError> {
        let modified = match self.presenter.present(&self.title, cache, labels, mutator) {
            Ok(modified) => modified,
            Err(e) => {
                let discarded = cache.cancel_edits();
                log::warn!("{}: 会话出错，已丢弃 {} 处修改: {}", self.title, discarded, e);
                return Err(e);
            }
        };

        if modified {
            let written = cache.save()?;
            log::info!("{}: 已保存 {} 条记录", self.title, written);
            Ok(SessionOutcome::Committed { written })
        } else {
            let discarded = cache.cancel_edits();
            log::info!("{}: 未保存（丢弃 {} 处修改）", self.title, discarded);
            Ok(SessionOutcome::Discarded)
        }
    }

    /// 编辑内存数组（视为一次性缓存）
    ///
    /// # 返回
    /// 是否保留了修改；返回 `false` 时数组与调用前完全相同
    pub fn edit_array(
        &mut self,
        items: &mut Vec<T>,
        labels: &[String],
        mutator: Option<Mutator<'_, T>>,
    ) -> Result<bool, EditorError> {
        let mut cache = RecordCache::from_vec(mem::take(items));
        let outcome = self.run(&mut cache, labels, mutator);

        // 内存缓存的条目全部已加载，取回不会失败
        *items = cache.into_values()?;
        outcome.map(|outcome| outcome.is_committed())
    }

    /// 编辑容器中某个槽位的根记录数组
    ///
    /// 反序列化 `key` 处的根记录，编辑其条目数组；只有在修改被保留时
    /// 才重新序列化整个根记录并覆盖该槽位。
    ///
    /// # 参数
    /// - `label`: 由位置和条目生成显示名称
    pub fn edit_table<A, F>(
        &mut self,
        store: &mut dyn RecordStore,
        key: &StoreKey,
        serializer: &dyn RecordSerializer<A>,
        label: F,
        mutator: Option<Mutator<'_, T>>,
    ) -> Result<bool, EditorError>
    where
        A: RecordTable<Entry = T>,
        F: Fn(usize, &T) -> String,
    {
        key.ensure_not_sentinel()?;
        let bytes = store.get(key)?;
        let mut root = serializer.deserialize(&bytes)?;

        let labels: Vec<String> = root
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| label(index, entry))
            .collect();

        let modified = self.edit_array(root.entries_mut(), &labels, mutator)?;
        if modified {
            let output = serializer.serialize(&root)?;
            log::debug!("覆盖槽位 {}: {} -> {} bytes", key, bytes.len(), output.len());
            store.set(key, output)?;
        }
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::presenter::AutoPresenter;
    use crate::io::{BinarySerializer, JsonSerializer, MemoryStore};
    use crate::records::{GiftEncounter, GiftEncounterArchive};

    struct FailingPresenter;

    impl Presenter<u32> for FailingPresenter {
        fn present(
            &mut self,
            _title: &str,
            records: &mut RecordCache<'_, u32>,
            _labels: &[String],
            _mutator: Option<Mutator<'_, u32>>,
        ) -> Result<bool, EditorError> {
            records.set(0, 99)?;
            Err(EditorError::Presenter("window closed".to_string()))
        }
    }

    fn bump_all() -> Mutator<'static, u32> {
        Box::new(|cache: &mut RecordCache<'_, u32>| {
            for i in 0..cache.len() {
                *cache.get_mut(i)? += 1;
            }
            Ok(())
        })
    }

    #[test]
    fn test_decline_discards_mutator_changes() {
        let serializer = JsonSerializer::<u32>::new();
        let mut store = MemoryStore::from_buffers(vec![b"1".to_vec(), b"2".to_vec()]);
        let before = store.snapshot();

        let mut presenter = AutoPresenter::decline();
        let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
        let outcome = EditSession::new("numbers", &mut presenter)
            .run(&mut cache, &[], Some(bump_all()))
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Discarded);
        assert_eq!(*cache.get(0).unwrap(), 1);
        drop(cache);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_apply_commits() {
        let serializer = JsonSerializer::<u32>::new();
        let mut store = MemoryStore::from_buffers(vec![b"1".to_vec(), b"2".to_vec()]);

        let mut presenter = AutoPresenter::apply();
        let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
        let outcome = EditSession::new("numbers", &mut presenter)
            .run(&mut cache, &[], Some(bump_all()))
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Committed { written: 2 });
        drop(cache);
        assert_eq!(store.snapshot(), vec![b"2".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_presenter_error_cancels() {
        let mut items = vec![1u32, 2];
        let mut presenter = FailingPresenter;
        let result = EditSession::new("numbers", &mut presenter).edit_array(&mut items, &[], None);

        assert!(matches!(result, Err(EditorError::Presenter(_))));
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_edit_array() {
        let mut items = vec![1u32, 2];
        let mut presenter = AutoPresenter::apply();
        let mut session = EditSession::new("numbers", &mut presenter);

        assert!(session.edit_array(&mut items, &[], Some(bump_all())).unwrap());
        assert_eq!(items, vec![2, 3]);
        assert!(!session.edit_array(&mut items, &[], None).unwrap());
        assert_eq!(items, vec![2, 3]);
    }

    #[test]
    fn test_edit_table_overwrites_only_when_modified() {
        let serializer = BinarySerializer::<GiftEncounterArchive>::new();
        let archive = GiftEncounterArchive { table: vec![GiftEncounter::new(25, 0, 5, 27)] };
        let mut store = MemoryStore::new();
        store.push_path("bin/field/gift.bin", serializer.serialize(&archive).unwrap()).unwrap();
        let key = StoreKey::path("bin/field/gift.bin");

        let mut presenter = AutoPresenter::apply();
        let mut session = EditSession::new("gifts", &mut presenter);

        let modified = session
            .edit_table(&mut store, &key, &serializer, |i, g: &GiftEncounter| format!("{} {}", i, g.species), None)
            .unwrap();
        assert!(!modified);

        let mutator: Mutator<'_, GiftEncounter> = Box::new(|cache: &mut RecordCache<'_, GiftEncounter>| {
            cache.get_mut(0)?.level = 50;
            Ok(())
        });
        let modified = session
            .edit_table(&mut store, &key, &serializer, |i, _| i.to_string(), Some(mutator))
            .unwrap();
        assert!(modified);

        let stored = serializer.deserialize(&store.get(&key).unwrap()).unwrap();
        assert_eq!(stored.table[0].level, 50);
    }
}
