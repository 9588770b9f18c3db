//! Module specification definitions.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use digest::typenum::U32;
use digest::Digest;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::Address;
use crate::storage::{MemoryStorage, Storage};

/// The `Spec` trait configures the key primitives used by a particular
/// ledger instance. Modules are generic over a [`Context`], which implements
/// `Spec`, so the same module code runs against any storage or hasher.
pub trait Spec {
    /// The address type identifying accounts. Typically calculated as the hash of a public key.
    type Address: BorshSerialize
        + BorshDeserialize
        + Serialize
        + DeserializeOwned
        + ::schemars::JsonSchema
        + Clone
        + Debug
        + Display
        + PartialEq
        + Eq
        + Hash
        + Ord
        + Send
        + Sync
        + 'static
        + AsRef<[u8]>
        + From<[u8; 32]>
        + FromStr<Err = anyhow::Error>;

    /// State storage used by the ledger.
    type Storage: Storage + Send + Sync;

    /// The hasher used for address derivation and prefixes.
    type Hasher: Digest<OutputSize = U32>;
}

/// A context contains information which is passed to modules during
/// transaction execution. Currently, context includes the sender of the transaction.
///
/// Context objects also implement the [`Spec`] trait, which specifies the
/// types used by this instance of the state machine.
pub trait Context: Spec + Clone + Debug + PartialEq + 'static {
    /// Sender of the transaction.
    fn sender(&self) -> &Self::Address;

    /// Constructor for the Context.
    fn new(sender: Self::Address) -> Self;
}

/// The [`Context`] used by the native ledger: bech32 addresses, in-memory
/// storage and Sha256.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultContext {
    /// The caller of the current transaction.
    pub sender: Address,
}

impl Spec for DefaultContext {
    type Address = Address;
    type Storage = MemoryStorage;
    type Hasher = sha2::Sha256;
}

impl Context for DefaultContext {
    fn sender(&self) -> &Self::Address {
        &self.sender
    }

    fn new(sender: Self::Address) -> Self {
        Self { sender }
    }
}
