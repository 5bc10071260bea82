//! 记录缓存与编辑会话集成测试
//!
//! 覆盖以下场景：
//! - 三条记录中修改一条后保存，只有该条的存储字节改变
//! - 取消后存储字节与会话开始前完全一致
//! - 连续两次保存结果相同
//! - 存储写入失败后可以安全重试
//! - 打包文件中的槽位编辑与写回

use nx_record_editor::editor::{AutoPresenter, EditSession, Mutator, RecordCache, SessionOutcome};
use nx_record_editor::io::{BinarySerializer, FolderStore, MemoryStore, RecordSerializer, RecordStore, StoreKey};
use nx_record_editor::records::{GiftEncounter, GiftEncounterArchive, MoveSlot, TrainerData, TrainerPoke};
use nx_record_editor::{EditorError, HashKey, PackArchive};
use tempfile::TempDir;

fn trainer(name: &str, species: u16) -> TrainerData {
    TrainerData {
        trainer_hash: HashKey::from_name(name),
        trainer_class: HashKey::NONE,
        ai_flags: 1,
        team: vec![TrainerPoke::new(species, 0, 20)],
    }
}

fn trainer_store() -> MemoryStore {
    let serializer = BinarySerializer::<TrainerData>::new();
    let mut store = MemoryStore::new();
    for (i, species) in [25u16, 133, 447].iter().enumerate() {
        let path = format!("bin/trainer/tr_{:03}.bin", i);
        let bytes = serializer.serialize(&trainer(&path, *species)).unwrap();
        store.push_path(path, bytes).unwrap();
    }
    store
}

/// 指定次数的写入会失败的存储
struct FlakyStore {
    inner: MemoryStore,
    failures_left: usize,
}

impl RecordStore for FlakyStore {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, key: &StoreKey) -> Result<Vec<u8>, EditorError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &StoreKey, bytes: Vec<u8>) -> Result<(), EditorError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(EditorError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
        }
        self.inner.set(key, bytes)
    }

    fn keys(&self) -> Vec<StoreKey> {
        self.inner.keys()
    }
}

#[test]
fn test_selective_commit_of_one_record() {
    let mut store = trainer_store();
    let before = store.snapshot();
    let serializer = BinarySerializer::<TrainerData>::new();

    {
        let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
        cache.get_mut(1).unwrap().team[0].level = 55;
        assert_eq!(cache.save().unwrap(), 1);
        assert_eq!(cache.get(1).unwrap().team[0].level, 55);
        assert!(!cache.is_materialized(0));
    }

    let after = store.snapshot();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_ne!(after[1], before[1]);
    assert_eq!(serializer.deserialize(&after[1]).unwrap().team[0].level, 55);
}

#[test]
fn test_cancel_leaves_store_untouched() {
    let mut store = trainer_store();
    let before = store.snapshot();
    let serializer = BinarySerializer::<TrainerData>::new();

    {
        let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
        for i in 0..cache.len() {
            let trainer = cache.get_mut(i).unwrap();
            trainer.ai_flags = 0xFF;
            trainer.team[0].moves[0] = MoveSlot { move_id: 1, mastered: true };
        }
        assert_eq!(cache.dirty_count(), 3);
        assert_eq!(cache.cancel_edits(), 3);
        assert!(!cache.is_modified());
    }

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_save_twice_is_idempotent() {
    let mut store = trainer_store();
    let serializer = BinarySerializer::<TrainerData>::new();

    let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
    cache.get_mut(2).unwrap().team.push(TrainerPoke::new(1, 0, 5));
    assert_eq!(cache.save().unwrap(), 1);
    assert_eq!(cache.save().unwrap(), 0);
    drop(cache);

    let first = store.snapshot();
    let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
    cache.save().unwrap();
    drop(cache);
    assert_eq!(store.snapshot(), first);
}

#[test]
fn test_failed_save_can_be_retried() {
    let mut store = FlakyStore { inner: trainer_store(), failures_left: 1 };
    let serializer = BinarySerializer::<TrainerData>::new();

    {
        let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
        cache.get_mut(0).unwrap().ai_flags = 7;
        cache.get_mut(2).unwrap().ai_flags = 9;

        assert!(matches!(cache.save(), Err(EditorError::IoError(_))));
        assert_eq!(cache.dirty_count(), 2);
        assert_eq!(cache.save().unwrap(), 2);
        assert!(!cache.is_modified());
    }

    let snapshot = store.inner.snapshot();
    assert_eq!(serializer.deserialize(&snapshot[0]).unwrap().ai_flags, 7);
    assert_eq!(serializer.deserialize(&snapshot[2]).unwrap().ai_flags, 9);
}

#[test]
fn test_declined_session_discards_mutator_changes() {
    let mut store = trainer_store();
    let before = store.snapshot();
    let serializer = BinarySerializer::<TrainerData>::new();

    let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
    let labels = cache.key_labels();
    assert_eq!(labels[0], "tr_000");

    let mutator: Mutator<'_, TrainerData> = Box::new(|cache: &mut RecordCache<'_, TrainerData>| {
        for i in 0..cache.len() {
            cache.get_mut(i)?.team[0].species = 1;
        }
        Ok(())
    });

    let mut presenter = AutoPresenter::decline();
    let outcome = EditSession::new("Trainers", &mut presenter)
        .run(&mut cache, &labels, Some(mutator))
        .unwrap();
    assert_eq!(outcome, SessionOutcome::Discarded);
    drop(cache);

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_folder_store_session() {
    let temp_dir = TempDir::new().unwrap();
    let serializer = BinarySerializer::<TrainerData>::new();
    for (name, species) in [("tr_a.bin", 25u16), ("tr_b.bin", 26)] {
        let bytes = serializer.serialize(&trainer(name, species)).unwrap();
        std::fs::write(temp_dir.path().join(name), bytes).unwrap();
    }
    std::fs::write(temp_dir.path().join("readme.txt"), b"skip me").unwrap();
    let untouched = std::fs::read(temp_dir.path().join("tr_a.bin")).unwrap();

    let mut store = FolderStore::open(temp_dir.path(), Some("bin")).unwrap();
    let mut cache = RecordCache::from_whole_store(&mut store, &serializer).unwrap();
    assert_eq!(cache.len(), 2);

    let mutator: Mutator<'_, TrainerData> = Box::new(|cache: &mut RecordCache<'_, TrainerData>| {
        cache.get_mut(1)?.team[0].level = 70;
        Ok(())
    });
    let mut presenter = AutoPresenter::apply();
    let outcome = EditSession::new("Trainers", &mut presenter)
        .run(&mut cache, &[], Some(mutator))
        .unwrap();
    assert_eq!(outcome, SessionOutcome::Committed { written: 1 });

    assert_eq!(std::fs::read(temp_dir.path().join("tr_a.bin")).unwrap(), untouched);
    let written = std::fs::read(temp_dir.path().join("tr_b.bin")).unwrap();
    assert_eq!(serializer.deserialize(&written).unwrap().team[0].level, 70);
}

#[test]
fn test_pack_slot_edit_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.trpak");
    let serializer = BinarySerializer::<GiftEncounterArchive>::new();

    let archive = GiftEncounterArchive {
        table: vec![GiftEncounter::new(722, 0, 5, 27), GiftEncounter::new(725, 0, 5, 27)],
    };
    let mut pack = PackArchive::new();
    pack.insert_path("bin/pokemon/data/personal_array.bin", vec![0, 0, 0, 0], true).unwrap();
    pack.insert_path("bin/field/encount/poke_add.bin", serializer.serialize(&archive).unwrap(), true)
        .unwrap();
    pack.write_to_file(&path).unwrap();
    let original = std::fs::read(&path).unwrap();

    let mut pack = PackArchive::open(&path).unwrap();
    let mutator: Mutator<'_, GiftEncounter> = Box::new(|cache: &mut RecordCache<'_, GiftEncounter>| {
        cache.get_mut(1)?.level = 10;
        Ok(())
    });
    let mut presenter = AutoPresenter::apply();
    let modified = EditSession::new("Gifts", &mut presenter)
        .edit_table(
            &mut pack,
            &StoreKey::path("bin/field/encount/poke_add.bin"),
            &serializer,
            |i, _| i.to_string(),
            Some(mutator),
        )
        .unwrap();
    assert!(modified);
    assert_eq!(pack.modified_count(), 1);
    pack.write_to_file(&path).unwrap();

    let reopened = PackArchive::open(&path).unwrap();
    let gifts = serializer
        .deserialize(&reopened.get(&StoreKey::path("bin/field/encount/poke_add.bin")).unwrap())
        .unwrap();
    assert_eq!(gifts.table[1].level, 10);
    assert_eq!(gifts.table[0], archive.table[0]);

    // 未修改条目的存储字节原样保留（头部 16 字节 + 2 个表项）
    let written = std::fs::read(&path).unwrap();
    let stored_size = u32::from_le_bytes(original[32..36].try_into().unwrap()) as usize;
    assert_eq!(&written[56..56 + stored_size], &original[56..56 + stored_size]);
}
