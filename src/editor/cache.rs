/// 记录缓存模块
///
/// 在一组记录之上维护内存工作集：按需反序列化、追踪修改，
/// 会话结束时要么写回全部修改（`save`），要么整体丢弃（`cancel_edits`）。

use crate::io::{RecordSerializer, RecordStore, StoreKey};
use crate::utils::EditorError;

/// 缓存条目
///
/// # 不变式
/// 当且仅当 `value` 与最近一次保存（或加载）时的值不同，条目才被视为已修改。
/// `original` 在条目第一次被可变借用时保存快照，保存或取消后清空。
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    dirty: bool,
    key: Option<StoreKey>,
    original: Option<T>,
}

impl<T: Clone + PartialEq> CacheEntry<T> {
    fn new(value: T, key: Option<StoreKey>) -> Self {
        Self { value, dirty: false, key, original: None }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> Option<&StoreKey> {
        self.key.as_ref()
    }

    /// 与快照不同才算修改（借用后又改回原值不算）
    pub fn is_dirty(&self) -> bool {
        self.dirty && self.original.as_ref().map_or(true, |original| *original != self.value)
    }

    fn value_mut(&mut self) -> &mut T {
        if self.original.is_none() {
            self.original = Some(self.value.clone());
        }
        self.dirty = true;
        &mut self.value
    }

    fn commit(&mut self) {
        self.dirty = false;
        self.original = None;
    }

    fn revert(&mut self) -> bool {
        let changed = self.is_dirty();
        if let Some(original) = self.original.take() {
            self.value = original;
        }
        self.dirty = false;
        changed
    }
}

/// 缓存的数据来源
enum CacheSource<'s, T> {
    /// 预先反序列化的数组，没有后端存储
    Memory,
    /// 由存储支持，每个位置在第一次访问时反序列化
    Store {
        store: &'s mut dyn RecordStore,
        keys: Vec<StoreKey>,
        serializer: &'s dyn RecordSerializer<T>,
    },
}

/// 记录缓存
///
/// # 核心特性
/// - **按需加载**: 存储支持的条目在第一次 `get` 时反序列化，每个会话至多一次
/// - **修改追踪**: 通过 `get_mut`/`set` 访问的条目与快照比较得出是否修改
/// - **选择性写回**: `save` 按索引递增顺序只写回已修改的条目
///
/// 缓存长度在整个生命周期内固定，不支持插入或删除。
///
/// # 使用示例
///
/// ```rust,ignore
/// let mut cache = RecordCache::from_whole_store(&mut store, &serializer)?;
/// cache.get_mut(1)?.level = 50;
/// let written = cache.save()?;
/// ```
pub struct RecordCache<'s, T> {
    entries: Vec<Option<CacheEntry<T>>>,
    source: CacheSource<'s, T>,
}

impl<'s, T: Clone + PartialEq> RecordCache<'s, T> {
    /// 从内存数组创建缓存
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            entries: values.into_iter().map(|v| Some(CacheEntry::new(v, None))).collect(),
            source: CacheSource::Memory,
        }
    }

    /// 从存储中的一组键创建缓存
    ///
    /// 不会立即读取任何数据；哨兵键在此处即被拒绝。
    pub fn from_store(
        store: &'s mut dyn RecordStore,
        keys: Vec<StoreKey>,
        serializer: &'s dyn RecordSerializer<T>,
    ) -> Result<Self, EditorError> {
        for key in &keys {
            key.ensure_not_sentinel()?;
        }

        Ok(Self {
            entries: keys.iter().map(|_| None).collect(),
            source: CacheSource::Store { store, keys, serializer },
        })
    }

    /// 以存储中的全部条目创建缓存
    pub fn from_whole_store(
        store: &'s mut dyn RecordStore,
        serializer: &'s dyn RecordSerializer<T>,
    ) -> Result<Self, EditorError> {
        let keys = store.keys();
        Self::from_store(store, keys, serializer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取记录（必要时反序列化）
    ///
    /// 反序列化失败时条目保持未加载状态，错误原样返回。
    pub fn get(&mut self, index: usize) -> Result<&T, EditorError> {
        self.entry_mut(index).map(|entry| &entry.value)
    }

    /// 获取可变记录并标记为已访问
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, EditorError> {
        self.entry_mut(index).map(CacheEntry::value_mut)
    }

    /// 替换记录
    pub fn set(&mut self, index: usize, value: T) -> Result<(), EditorError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// 条目是否已修改（未加载的条目永远未修改）
    pub fn is_dirty(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .and_then(Option::as_ref)
            .map_or(false, CacheEntry::is_dirty)
    }

    /// 已修改的条目数量
    pub fn dirty_count(&self) -> usize {
        self.loaded().filter(|entry| entry.is_dirty()).count()
    }

    /// 是否存在任何修改
    pub fn is_modified(&self) -> bool {
        self.loaded().any(CacheEntry::is_dirty)
    }

    /// 条目是否已加载
    pub fn is_materialized(&self, index: usize) -> bool {
        matches!(self.entries.get(index), Some(Some(_)))
    }

    /// 条目对应的存储键（内存缓存没有键）
    pub fn key(&self, index: usize) -> Option<&StoreKey> {
        match &self.source {
            CacheSource::Memory => None,
            CacheSource::Store { keys, .. } => keys.get(index),
        }
    }

    /// 用于显示的标签：存储键的短名称，或位置索引
    pub fn key_labels(&self) -> Vec<String> {
        (0..self.len())
            .map(|index| match self.key(index) {
                Some(key) => key.display_name(),
                None => index.to_string(),
            })
            .collect()
    }

    /// 写回全部已修改的条目
    ///
    /// 按索引递增顺序写回，未修改的条目不会被触碰。
    /// 存储写入失败时错误原样返回，且所有修改标记保持不变，可安全重试。
    ///
    /// # 返回
    /// 写回的条目数量
    pub fn save(&mut self) -> Result<usize, EditorError> {
        let Self { entries, source } = self;

        let mut written = 0;
        match source {
            CacheSource::Memory => {
                written = entries.iter().flatten().filter(|e| e.is_dirty()).count();
            }
            CacheSource::Store { store, serializer, .. } => {
                for (index, entry) in entries.iter().enumerate() {
                    let Some(entry) = entry else { continue };
                    if !entry.is_dirty() {
                        continue;
                    }
                    let Some(key) = entry.key() else { continue };

                    let bytes = serializer.serialize(&entry.value)?;
                    log::debug!("写回条目 {} ({}): {} bytes", index, key, bytes.len());
                    store.set(key, bytes)?;
                    written += 1;
                }
            }
        }

        for entry in entries.iter_mut().flatten() {
            entry.commit();
        }
        Ok(written)
    }

    /// 丢弃全部内存中的修改
    ///
    /// 不会写入存储；已加载的条目恢复为加载（或上次保存）时的值。
    ///
    /// # 返回
    /// 被丢弃的已修改条目数量
    pub fn cancel_edits(&mut self) -> usize {
        self.entries.iter_mut().flatten().map(CacheEntry::revert).filter(|changed| *changed).count()
    }

    /// 取出全部记录（未加载的条目会先加载）
    pub fn into_values(mut self) -> Result<Vec<T>, EditorError> {
        for index in 0..self.len() {
            self.entry_mut(index)?;
        }
        Ok(self.entries.into_iter().flatten().map(|entry| entry.value).collect())
    }

    fn loaded(&self) -> impl Iterator<Item = &CacheEntry<T>> {
        self.entries.iter().flatten()
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut CacheEntry<T>, EditorError> {
        let len = self.entries.len();
        let Self { entries, source } = self;
        let slot = entries
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })?;

        let entry = match slot.take() {
            Some(entry) => entry,
            None => Self::load(source, index)?,
        };
        Ok(slot.insert(entry))
    }

    fn load(source: &CacheSource<'s, T>, index: usize) -> Result<CacheEntry<T>, EditorError> {
        match source {
            CacheSource::Memory => Err(EditorError::KeyNotFound(format!("#{}", index))),
            CacheSource::Store { store, keys, serializer } => {
                let key = keys
                    .get(index)
                    .ok_or(EditorError::IndexOutOfRange { index, len: keys.len() })?;
                let bytes = store.get(key)?;
                let value = serializer.deserialize(&bytes)?;
                log::debug!("加载条目 {} ({}): {} bytes", index, key, bytes.len());
                Ok(CacheEntry::new(value, Some(key.clone())))
            }
        }
    }
}
