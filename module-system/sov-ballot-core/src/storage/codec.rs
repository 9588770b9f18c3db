//! Serialization and deserialization -related logic.

/// A trait for types that can serialize and deserialize keys for storage
/// access.
pub trait StateKeyCodec<K: ?Sized> {
    /// Serializes a key into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the key type are
    /// supposed to be serializable.
    fn encode_key(&self, key: &K) -> Vec<u8>;
}

/// A trait for types that can serialize and deserialize values for storage
/// access.
pub trait StateValueCodec<V> {
    /// Error type that can arise during deserialization.
    type ValueError: std::fmt::Debug;

    /// Serializes a value into a bytes vector.
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Tries to deserialize a value from a bytes slice, and returns a
    /// [`Result`] with either the deserialized value or an error.
    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError>;

    /// Deserializes a value from a bytes slice.
    ///
    /// # Panics
    /// Panics if the call to [`StateValueCodec::try_decode_value`] fails. Values
    /// are only ever written by [`StateValueCodec::encode_value`], so a failure
    /// means the storage is corrupted.
    fn decode_value(&self, bytes: &[u8]) -> V {
        self.try_decode_value(bytes).unwrap_or_else(|err| {
            panic!(
                "Failed to decode value 0x{}, error: {:?}",
                hex::encode(bytes),
                err
            )
        })
    }
}

/// A marker trait for types that implement both [`StateKeyCodec`] and
/// [`StateValueCodec`].
pub trait StateCodec<K, V>: StateKeyCodec<K> + StateValueCodec<V> {}

impl<K, V, C> StateCodec<K, V> for C where C: StateKeyCodec<K> + StateValueCodec<V> {}

/// A [`StateCodec`] that uses [`borsh`] for all keys and values.
#[derive(Debug, Default, PartialEq, Eq, Clone, borsh::BorshDeserialize, borsh::BorshSerialize)]
pub struct BorshCodec;

impl<K> StateKeyCodec<K> for BorshCodec
where
    K: borsh::BorshSerialize,
{
    fn encode_key(&self, key: &K) -> Vec<u8> {
        // Serializing into a `Vec` cannot fail.
        key.try_to_vec().unwrap_or_default()
    }
}

impl<V> StateValueCodec<V> for BorshCodec
where
    V: borsh::BorshSerialize + borsh::BorshDeserialize,
{
    type ValueError = std::io::Error;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        value.try_to_vec().unwrap_or_default()
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError> {
        V::try_from_slice(bytes)
    }
}
