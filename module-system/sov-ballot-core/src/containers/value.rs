//! Container for a single value.

use std::marker::PhantomData;

use thiserror::Error;

use crate::common::Prefix;
use crate::storage::codec::{BorshCodec, StateKeyCodec, StateValueCodec};
use crate::storage::{Storage, WorkingSet};

/// Container for a single value.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StateValue<V, C = BorshCodec> {
    _phantom: PhantomData<V>,
    codec: C,
    prefix: Prefix,
}

/// Error type for `StateValue` get method.
#[derive(Debug, Error)]
pub enum Error {
    /// No value was ever set under this prefix.
    #[error("Value not found for prefix: {0}")]
    MissingValue(Prefix),
}

impl<V> StateValue<V>
where
    BorshCodec: StateValueCodec<V>,
{
    /// Creates a new [`StateValue`] with the given prefix and the default
    /// [`StateValueCodec`] (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<V, C> StateValue<V, C>
where
    C: StateValueCodec<V>,
{
    /// Creates a new [`StateValue`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: PhantomData,
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateValue`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    fn codec(&self) -> SingletonCodec<'_, C> {
        SingletonCodec(&self.codec)
    }

    /// Sets a value in the StateValue.
    pub fn set<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.codec(), &(), value)
    }

    /// Gets a value from the StateValue or None if the value is absent.
    pub fn get<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.codec(), &())
    }

    /// Gets a value from the StateValue or Error if the value is absent.
    pub fn get_or_err<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Result<V, Error> {
        self.get(working_set)
            .ok_or_else(|| Error::MissingValue(self.prefix().clone()))
    }

    /// Deletes a value from the StateValue.
    pub fn delete<S: Storage>(&self, working_set: &mut WorkingSet<S>) {
        working_set.delete_value(self.prefix(), &self.codec(), &());
    }
}

/// Wraps a value codec so that the storage key of a [`StateValue`] is its
/// prefix and nothing else.
struct SingletonCodec<'a, C>(&'a C);

impl<'a, C> StateKeyCodec<()> for SingletonCodec<'a, C> {
    fn encode_key(&self, _key: &()) -> Vec<u8> {
        Vec::new()
    }
}

impl<'a, V, C> StateValueCodec<V> for SingletonCodec<'a, C>
where
    C: StateValueCodec<V>,
{
    type ValueError = C::ValueError;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        self.0.encode_value(value)
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError> {
        self.0.try_decode_value(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn set_get_delete() {
        let mut working_set = WorkingSet::new(MemoryStorage::new());
        let value = StateValue::<u64>::new(Prefix::new(b"value".to_vec()));

        assert_eq!(value.get(&mut working_set), None);
        assert!(matches!(
            value.get_or_err(&mut working_set),
            Err(Error::MissingValue(_))
        ));

        value.set(&11, &mut working_set);
        assert_eq!(value.get(&mut working_set), Some(11));

        value.delete(&mut working_set);
        assert_eq!(value.get(&mut working_set), None);
    }

    #[test]
    fn distinct_prefixes_do_not_collide() {
        let mut working_set = WorkingSet::new(MemoryStorage::new());
        let a = StateValue::<bool>::new(Prefix::new(b"a".to_vec()));
        let b = StateValue::<bool>::new(Prefix::new(b"b".to_vec()));

        a.set(&true, &mut working_set);
        assert_eq!(b.get(&mut working_set), None);
        b.set(&false, &mut working_set);
        a.delete(&mut working_set);
        assert_eq!(a.get(&mut working_set), None);
        assert_eq!(b.get(&mut working_set), Some(false));
    }
}
