use borsh::{BorshDeserialize, BorshSerialize};

/// An event emitted by a module during a call.
///
/// The key is a human readable tag; the value is the borsh encoding of the
/// module's typed event.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Event {
    key: String,
    value: Vec<u8>,
}

impl Event {
    /// Creates an event carrying the borsh encoding of `value`.
    pub fn new<E: BorshSerialize>(key: &str, value: &E) -> std::io::Result<Self> {
        Ok(Self {
            key: key.to_owned(),
            value: value.try_to_vec()?,
        })
    }

    /// The event tag.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The encoded event payload.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Decodes the payload back into the module's typed event.
    pub fn decode<E: BorshDeserialize>(&self) -> std::io::Result<E> {
        E::try_from_slice(&self.value)
    }
}
