//! Runtime state machine definitions.

use std::collections::{BTreeMap, HashMap};
use std::{fmt, mem};

use borsh::BorshSerialize;
use tracing::error;

use crate::common::Prefix;
use crate::storage::codec::{StateKeyCodec, StateValueCodec};
use crate::storage::{Event, Storage, StorageKey, StorageValue};

/// Writes extracted from a [`StateCheckpoint`], sorted by key. A `None`
/// value marks a deleted key.
pub type OrderedWrites = Vec<(StorageKey, Option<StorageValue>)>;

/// A storage reader and writer
pub trait StateReaderAndWriter {
    /// Get a value from the storage.
    fn get(&mut self, key: &StorageKey) -> Option<StorageValue>;

    /// Replaces a storage value.
    fn set(&mut self, key: &StorageKey, value: StorageValue);

    /// Deletes a storage value.
    fn delete(&mut self, key: &StorageKey);
}

/// Accumulates writes on top of the underlying storage.
struct Delta<S: Storage> {
    inner: S,
    writes: BTreeMap<StorageKey, Option<StorageValue>>,
}

impl<S: Storage> Delta<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Default::default(),
        }
    }

    fn freeze(&mut self) -> OrderedWrites {
        mem::take(&mut self.writes).into_iter().collect()
    }
}

impl<S: Storage> fmt::Debug for Delta<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delta")
            .field("pending_writes", &self.writes.len())
            .finish()
    }
}

impl<S: Storage> StateReaderAndWriter for Delta<S> {
    fn get(&mut self, key: &StorageKey) -> Option<StorageValue> {
        match self.writes.get(key) {
            Some(value) => value.clone(),
            None => self.inner.get(key),
        }
    }

    fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.writes.insert(key.clone(), Some(value));
    }

    fn delete(&mut self, key: &StorageKey) {
        self.writes.insert(key.clone(), None);
    }
}

/// A wrapper that adds additional writes on top of an underlying writer.
/// These are handy for implementing operations that might revert on top of an existing
/// working set, without running the risk that the whole working set will be discarded if some particular
/// operation reverts.
struct RevertableWriter<T> {
    inner: T,
    writes: HashMap<StorageKey, Option<StorageValue>>,
}

impl<T: fmt::Debug> fmt::Debug for RevertableWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevertableWriter")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T> RevertableWriter<T>
where
    T: StateReaderAndWriter,
{
    fn new(inner: T) -> Self {
        Self {
            inner,
            writes: Default::default(),
        }
    }

    fn commit(mut self) -> T {
        for (k, v) in self.writes.into_iter() {
            if let Some(v) = v {
                self.inner.set(&k, v);
            } else {
                self.inner.delete(&k);
            }
        }

        self.inner
    }

    fn revert(self) -> T {
        self.inner
    }
}

impl<T: StateReaderAndWriter> StateReaderAndWriter for RevertableWriter<T> {
    fn get(&mut self, key: &StorageKey) -> Option<StorageValue> {
        if let Some(value) = self.writes.get(key) {
            return value.clone();
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.writes.insert(key.clone(), Some(value));
    }

    fn delete(&mut self, key: &StorageKey) {
        self.writes.insert(key.clone(), None);
    }
}

/// This structure is responsible for storing the committed part of the `read-write` set.
///
/// A [`StateCheckpoint`] can be obtained from a [`WorkingSet`] in two ways:
///  1. With [`WorkingSet::checkpoint`], which keeps the changes of the working set.
///  2. With [`WorkingSet::revert`], which drops them.
pub struct StateCheckpoint<S: Storage> {
    delta: Delta<S>,
}

impl<S: Storage> StateCheckpoint<S> {
    /// Creates a new [`StateCheckpoint`] instance without any changes, backed
    /// by the given [`Storage`].
    pub fn new(inner: S) -> Self {
        Self {
            delta: Delta::new(inner),
        }
    }

    /// Transforms this [`StateCheckpoint`] back into a [`WorkingSet`].
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            delta: RevertableWriter::new(self.delta),
            events: Default::default(),
        }
    }

    /// Extracts the ordered writes from this [`StateCheckpoint`].
    ///
    /// Pass them to [`Storage::commit`] to make them durable. Note that this
    /// data is moved **out** of the [`StateCheckpoint`] i.e. it can't be
    /// extracted twice.
    pub fn freeze(&mut self) -> OrderedWrites {
        self.delta.freeze()
    }
}

impl<S: Storage> fmt::Debug for StateCheckpoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCheckpoint")
            .field("delta", &self.delta)
            .finish()
    }
}

/// This structure contains the read-write set and the events collected during the execution of a call.
/// There are two ways to convert it into a [`StateCheckpoint`]:
/// 1. By using the [`WorkingSet::checkpoint`] method, where all the changes are added to the underlying [`StateCheckpoint`].
/// 2. By using the [`WorkingSet::revert`] method, where the most recent changes and events are dropped.
pub struct WorkingSet<S: Storage> {
    delta: RevertableWriter<Delta<S>>,
    events: Vec<Event>,
}

impl<S: Storage> WorkingSet<S> {
    /// Creates a new [`WorkingSet`] instance backed by the given [`Storage`].
    pub fn new(inner: S) -> Self {
        StateCheckpoint::new(inner).to_revertable()
    }

    /// Turns this [`WorkingSet`] into a [`StateCheckpoint`], keeping all changes.
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.commit(),
        }
    }

    /// Reverts the most recent changes to this [`WorkingSet`], returning a pristine
    /// [`StateCheckpoint`] instance.
    pub fn revert(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.revert(),
        }
    }

    /// Adds a typed event to the working set.
    pub fn add_event<E: BorshSerialize>(&mut self, key: &str, event: &E) {
        match Event::new(key, event) {
            Ok(event) => self.events.push(event),
            Err(e) => error!(key, "Unable to encode event: {}", e),
        }
    }

    /// Extracts all events from this working set.
    pub fn take_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// Returns an immutable slice of all events that have been previously
    /// written to this working set.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the storage backing this working set.
    pub fn backing(&self) -> &S {
        &self.delta.inner.inner
    }

    pub(crate) fn set_value<K, V, C>(&mut self, prefix: &Prefix, codec: &C, key: &K, value: &V)
    where
        K: ?Sized,
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        let storage_value = StorageValue::new(value, codec);
        self.set(&storage_key, storage_value);
    }

    pub(crate) fn get_value<K, V, C>(&mut self, prefix: &Prefix, codec: &C, key: &K) -> Option<V>
    where
        K: ?Sized,
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        self.get_decoded(&storage_key, codec)
    }

    pub(crate) fn delete_value<K, C>(&mut self, prefix: &Prefix, codec: &C, key: &K)
    where
        K: ?Sized,
        C: StateKeyCodec<K>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        self.delete(&storage_key);
    }

    fn get_decoded<V, C>(&mut self, storage_key: &StorageKey, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        let storage_value = self.get(storage_key)?;
        Some(codec.decode_value(storage_value.value()))
    }
}

impl<S: Storage> StateReaderAndWriter for WorkingSet<S> {
    fn get(&mut self, key: &StorageKey) -> Option<StorageValue> {
        self.delta.get(key)
    }

    fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.delta.set(key, value)
    }

    fn delete(&mut self, key: &StorageKey) {
        self.delta.delete(key)
    }
}

impl<S: Storage> fmt::Debug for WorkingSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingSet")
            .field("delta", &self.delta)
            .field("events", &self.events.len())
            .finish()
    }
}
