use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context as _;
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::debug;

use crate::storage::{OrderedWrites, Storage, StorageKey, StorageValue};

/// Version tag written in front of every state file.
const STATE_FILE_VERSION: u8 = 1;

#[derive(BorshSerialize, BorshDeserialize)]
struct StateFile {
    version: u8,
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

/// An in-process key-value [`Storage`].
///
/// Clones share the same data. The whole map can be dumped to and restored
/// from a file with [`MemoryStorage::save_to`] and [`MemoryStorage::load_from`].
#[derive(Clone, Default)]
pub struct MemoryStorage {
    db: Arc<RwLock<BTreeMap<StorageKey, StorageValue>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current content that shares nothing with `self`.
    pub fn snapshot(&self) -> Self {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner).clone();
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.db.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the full content of the storage to `path`, replacing any existing file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let entries = {
            let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
            db.iter()
                .map(|(k, v)| (k.as_bytes().to_vec(), v.value().to_vec()))
                .collect::<Vec<_>>()
        };

        let file = StateFile {
            version: STATE_FILE_VERSION,
            entries,
        };
        let bytes = file.try_to_vec()?;
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        debug!(path = %path.display(), keys = file.entries.len(), "Saved state");
        Ok(())
    }

    /// Restores a storage previously written with [`MemoryStorage::save_to`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let file = StateFile::try_from_slice(&bytes)
            .with_context(|| format!("Malformed state file {}", path.display()))?;

        anyhow::ensure!(
            file.version == STATE_FILE_VERSION,
            "Unsupported state file version {}, expected {}",
            file.version,
            STATE_FILE_VERSION
        );

        let db = file
            .entries
            .into_iter()
            .map(|(k, v)| (StorageKey::from(k), StorageValue::from(v)))
            .collect::<BTreeMap<_, _>>();
        debug!(path = %path.display(), keys = db.len(), "Loaded state");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("keys", &self.len())
            .finish()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        self.db
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn commit(&self, writes: OrderedWrites) {
        let mut db = self.db.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in writes {
            match value {
                Some(value) => {
                    db.insert(key, value);
                }
                None => {
                    db.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Prefix;
    use crate::storage::codec::BorshCodec;

    fn key(n: u8) -> StorageKey {
        StorageKey::new(&Prefix::new(b"test/".to_vec()), &n, &BorshCodec)
    }

    #[test]
    fn commit_inserts_and_deletes() {
        let storage = MemoryStorage::new();
        storage.commit(vec![
            (key(1), Some(StorageValue::from(vec![1]))),
            (key(2), Some(StorageValue::from(vec![2]))),
        ]);
        assert_eq!(storage.len(), 2);

        storage.commit(vec![(key(1), None)]);
        assert_eq!(storage.get(&key(1)), None);
        assert_eq!(storage.get(&key(2)), Some(StorageValue::from(vec![2])));
    }

    #[test]
    fn snapshots_are_detached() {
        let storage = MemoryStorage::new();
        storage.commit(vec![(key(4), Some(StorageValue::from(vec![4])))]);

        let snapshot = storage.snapshot();
        snapshot.commit(vec![(key(4), None), (key(5), Some(StorageValue::from(vec![5])))]);
        storage.commit(vec![(key(6), Some(StorageValue::from(vec![6])))]);

        assert_eq!(storage.get(&key(4)), Some(StorageValue::from(vec![4])));
        assert_eq!(storage.get(&key(5)), None);
        assert_eq!(snapshot.get(&key(6)), None);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn clones_share_data() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.commit(vec![(key(3), Some(StorageValue::from(vec![3])))]);
        assert_eq!(handle.get(&key(3)), Some(StorageValue::from(vec![3])));
    }

    #[test]
    fn save_and_load_preserve_content() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("state.bin");

        let storage = MemoryStorage::new();
        storage.commit(vec![
            (key(4), Some(StorageValue::from(vec![4, 4]))),
            (key(5), Some(StorageValue::from(vec![]))),
        ]);
        storage.save_to(&path).unwrap();

        let restored = MemoryStorage::load_from(&path).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(&key(4)), Some(StorageValue::from(vec![4, 4])));
        assert_eq!(restored.get(&key(5)), Some(StorageValue::from(vec![])));
    }

    #[test]
    fn load_rejects_garbage() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [9u8, 9, 9]).unwrap();
        assert!(MemoryStorage::load_from(file.path()).is_err());
    }
}
