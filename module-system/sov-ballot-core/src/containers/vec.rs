//! Container for an indexed sequence of values.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use thiserror::Error;

use crate::common::Prefix;
use crate::containers::{StateMap, StateValue};
use crate::storage::codec::{BorshCodec, StateCodec, StateValueCodec};
use crate::storage::{Storage, WorkingSet};

/// An append-friendly sequence of values, indexed from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVec<V, C = BorshCodec> {
    _phantom: PhantomData<V>,
    prefix: Prefix,
    len_value: StateValue<u64, C>,
    elems: StateMap<u64, V, C>,
}

/// Error type for `StateVec` get method.
#[derive(Debug, Error)]
pub enum Error {
    /// The index is not below the current length.
    #[error("Index out of bounds for index: {0}")]
    IndexOutOfBounds(u64),
    /// The index is in bounds but nothing is stored for it.
    #[error("Value not found for prefix: {0} and index: {1}")]
    MissingValue(Prefix, u64),
}

impl<V> StateVec<V>
where
    BorshCodec: StateValueCodec<V>,
{
    /// Creates a new [`StateVec`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<V, C> StateVec<V, C>
where
    C: StateCodec<u64, V> + StateValueCodec<u64> + Clone,
{
    /// Creates a new [`StateVec`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        let len_value = StateValue::with_codec(prefix.extended(b"l"), codec.clone());
        let elems = StateMap::with_codec(prefix.extended(b"e"), codec);
        Self {
            _phantom: PhantomData,
            prefix,
            len_value,
            elems,
        }
    }

    /// Returns the prefix used when this [`StateVec`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    fn set_len<S: Storage>(&self, length: u64, working_set: &mut WorkingSet<S>) {
        self.len_value.set(&length, working_set);
    }

    /// Overwrites the value at `index`.
    /// If the index is out of bounds, returns an error.
    /// To append a value, use [`StateVec::push`].
    pub fn set<S: Storage>(
        &self,
        index: u64,
        value: &V,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), Error> {
        if index < self.len(working_set) {
            self.elems.set(&index, value, working_set);
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds(index))
        }
    }

    /// Returns the value for the given index.
    pub fn get<S: Storage>(&self, index: u64, working_set: &mut WorkingSet<S>) -> Option<V> {
        if index < self.len(working_set) {
            self.elems.get(&index, working_set)
        } else {
            None
        }
    }

    /// Returns the value for the given index, or an error if the index is
    /// out of bounds or the value is absent.
    pub fn get_or_err<S: Storage>(
        &self,
        index: u64,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, Error> {
        if index < self.len(working_set) {
            self.elems
                .get(&index, working_set)
                .ok_or_else(|| Error::MissingValue(self.prefix().clone(), index))
        } else {
            Err(Error::IndexOutOfBounds(index))
        }
    }

    /// Returns the length of the [`StateVec`].
    pub fn len<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> u64 {
        self.len_value.get(working_set).unwrap_or_default()
    }

    /// Returns `true` if the [`StateVec`] holds no values.
    pub fn is_empty<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> bool {
        self.len(working_set) == 0
    }

    /// Appends a value and returns its index.
    pub fn push<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) -> u64 {
        let len = self.len(working_set);
        self.elems.set(&len, value, working_set);
        self.set_len(len + 1, working_set);
        len
    }

    /// Returns an iterator over all the values in the [`StateVec`].
    pub fn iter<'a, 'ws, S: Storage>(
        &'a self,
        working_set: &'ws mut WorkingSet<S>,
    ) -> StateVecIter<'a, 'ws, V, C, S> {
        let len = self.len(working_set);
        StateVecIter {
            state_vec: self,
            ws: working_set,
            len,
            next_i: 0,
        }
    }
}

/// An [`Iterator`] over a [`StateVec`]
///
/// See [`StateVec::iter`] for more details.
pub struct StateVecIter<'a, 'ws, V, C, S: Storage> {
    state_vec: &'a StateVec<V, C>,
    ws: &'ws mut WorkingSet<S>,
    len: u64,
    next_i: u64,
}

impl<'a, 'ws, V, C, S> Iterator for StateVecIter<'a, 'ws, V, C, S>
where
    C: StateCodec<u64, V> + StateValueCodec<u64> + Clone,
    S: Storage,
{
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_i >= self.len {
            return None;
        }
        let elem = self.state_vec.elems.get(&self.next_i, self.ws);
        self.next_i += 1;
        elem
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.len - self.next_i).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<'a, 'ws, V, C, S> ExactSizeIterator for StateVecIter<'a, 'ws, V, C, S>
where
    C: StateCodec<u64, V> + StateValueCodec<u64> + Clone,
    S: Storage,
{
}

impl<'a, 'ws, V, C, S> FusedIterator for StateVecIter<'a, 'ws, V, C, S>
where
    C: StateCodec<u64, V> + StateValueCodec<u64> + Clone,
    S: Storage,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn push_returns_sequential_indices() {
        let mut working_set = WorkingSet::new(MemoryStorage::new());
        let vec = StateVec::<String>::new(Prefix::new(b"vec/".to_vec()));

        assert!(vec.is_empty(&mut working_set));
        assert_eq!(vec.push(&"a".to_owned(), &mut working_set), 0);
        assert_eq!(vec.push(&"b".to_owned(), &mut working_set), 1);
        assert_eq!(vec.len(&mut working_set), 2);

        let all: Vec<String> = vec.iter(&mut working_set).collect();
        assert_eq!(all, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn out_of_bounds_access() {
        let mut working_set = WorkingSet::new(MemoryStorage::new());
        let vec = StateVec::<u64>::new(Prefix::new(b"vec/".to_vec()));
        vec.push(&5, &mut working_set);

        assert_eq!(vec.get(1, &mut working_set), None);
        assert!(matches!(
            vec.get_or_err(1, &mut working_set),
            Err(Error::IndexOutOfBounds(1))
        ));
        assert!(matches!(
            vec.set(3, &9, &mut working_set),
            Err(Error::IndexOutOfBounds(3))
        ));

        vec.set(0, &6, &mut working_set).unwrap();
        assert_eq!(vec.get_or_err(0, &mut working_set).unwrap(), 6);
    }
}
