//! Container for keyed values.

use std::marker::PhantomData;

use thiserror::Error;

use crate::common::Prefix;
use crate::storage::codec::{BorshCodec, StateCodec};
use crate::storage::{Storage, StorageKey, WorkingSet};

/// A container that maps keys to values.
///
/// Every key is stored under the map's prefix, so two maps with different
/// prefixes never see each other's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMap<K, V, C = BorshCodec> {
    _phantom: (PhantomData<K>, PhantomData<V>),
    codec: C,
    prefix: Prefix,
}

/// Error type for the [`StateMap::get_or_err`] method.
#[derive(Debug, Error)]
pub enum Error {
    /// The key has no value in the map.
    #[error("Value not found for prefix: {0} and storage key: {1}")]
    MissingValue(Prefix, StorageKey),
}

impl<K, V> StateMap<K, V> {
    /// Creates a new [`StateMap`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<K, V, C> StateMap<K, V, C> {
    /// Creates a new [`StateMap`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateMap`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl<K, V, C> StateMap<K, V, C>
where
    C: StateCodec<K, V>,
{
    /// Inserts a key-value pair into the map.
    pub fn set<S: Storage>(&self, key: &K, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.codec, key, value)
    }

    /// Returns the value corresponding to the key, or [`None`] if the map
    /// doesn't contain the key.
    pub fn get<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.codec, key)
    }

    /// Returns the value corresponding to the key or [`Error`] if the key is
    /// absent in the map.
    pub fn get_or_err<S: Storage>(
        &self,
        key: &K,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, Error> {
        self.get(key, working_set).ok_or_else(|| {
            Error::MissingValue(
                self.prefix().clone(),
                StorageKey::new(self.prefix(), key, &self.codec),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn missing_key_reports_storage_key() {
        let mut working_set = WorkingSet::new(MemoryStorage::new());
        let map = StateMap::<u32, String>::new(Prefix::new(b"names/".to_vec()));

        map.set(&1, &"one".to_owned(), &mut working_set);
        assert_eq!(map.get(&1, &mut working_set).as_deref(), Some("one"));

        let err = map.get_or_err(&2, &mut working_set).unwrap_err();
        let Error::MissingValue(prefix, key) = err;
        assert_eq!(&prefix, map.prefix());
        assert!(key.as_bytes().starts_with(b"names/"));
    }
}
