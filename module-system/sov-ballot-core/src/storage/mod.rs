//! Storage and state management interfaces for modules.

pub mod codec;
mod event;
mod memory;
mod scratchpad;

use std::fmt::Display;
use std::sync::Arc;

pub use event::Event;
pub use memory::MemoryStorage;
pub use scratchpad::{OrderedWrites, StateCheckpoint, StateReaderAndWriter, WorkingSet};

use crate::common::Prefix;
use crate::storage::codec::{StateKeyCodec, StateValueCodec};

/// The key type of a [`Storage`]: a container prefix followed by the encoded
/// user key. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl StorageKey {
    /// Creates a new [`StorageKey`] that combines a prefix and a key.
    pub fn new<K, KC>(prefix: &Prefix, key: &K, codec: &KC) -> Self
    where
        KC: StateKeyCodec<K> + ?Sized,
        K: ?Sized,
    {
        let encoded_key = codec.encode_key(key);

        let mut full_key = Vec::<u8>::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend_from_slice(prefix.as_bytes());
        full_key.extend(encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }

    /// Creates a key made of the prefix alone, used by single value containers.
    pub fn singleton(prefix: &Prefix) -> Self {
        Self {
            key: Arc::new(prefix.as_bytes().to_vec()),
        }
    }

    /// Returns the raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl From<Vec<u8>> for StorageKey {
    fn from(key: Vec<u8>) -> Self {
        Self { key: Arc::new(key) }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.key.as_ref()))
    }
}

/// A serialized value suitable for storing. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl StorageValue {
    /// Create a new storage value by serializing the input with the given codec.
    pub fn new<V, VC>(value: &V, codec: &VC) -> Self
    where
        VC: StateValueCodec<V>,
    {
        Self {
            value: Arc::new(codec.encode_value(value)),
        }
    }

    /// Get the bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// An interface for a key-value store holding module state.
///
/// Implementations are cheap handles: cloning a storage yields another handle
/// to the same underlying data.
pub trait Storage: Clone {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &StorageKey) -> Option<StorageValue>;

    /// Applies a set of writes produced by [`StateCheckpoint::freeze`].
    /// A `None` value deletes the key.
    fn commit(&self, writes: OrderedWrites);
}
