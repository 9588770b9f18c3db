use std::fmt;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use borsh::{BorshDeserialize, BorshSerialize};
use derive_more::{From, Into};

use crate::common::Bech32ParseError;

/// Human readable part of every bech32m encoded address.
pub const HRP: &str = "vote";

/// A 32 byte account identity.
///
/// Human readable encodings (`Display`, JSON, TOML) use bech32m with the
/// [`HRP`] prefix, binary encodings use the raw bytes.
#[derive(
    PartialEq, Clone, Copy, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize, From, Into,
)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates a new address containing the given bytes
    pub const fn new(addr: [u8; 32]) -> Self {
        Self(addr)
    }

    /// Parses a bech32m string carrying the [`HRP`] prefix.
    pub fn from_bech32(s: &str) -> Result<Self, Bech32ParseError> {
        let (hrp, data, _variant) = bech32::decode(s)?;
        if hrp != HRP {
            return Err(Bech32ParseError::WrongHRP(hrp));
        }

        let bytes = Vec::<u8>::from_base32(&data)?;
        let addr = <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| Bech32ParseError::WrongLength(bytes.len()))?;
        Ok(Self(addr))
    }

    /// Encodes the address as bech32m.
    pub fn to_bech32(&self) -> String {
        bech32::encode(HRP, self.0.to_base32(), Variant::Bech32m)
            .unwrap_or_else(|_| format!("0x{}", hex::encode(self.0)))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = anyhow::Error;

    fn try_from(addr: &'a [u8]) -> Result<Self, Self::Error> {
        let addr = <[u8; 32]>::try_from(addr)
            .map_err(|_| anyhow::anyhow!("Address must be 32 bytes long, got {}", addr.len()))?;
        Ok(Self(addr))
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_bech32(s)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_bech32())
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_bech32())
        } else {
            serde::Serialize::serialize(&self.0, serializer)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as serde::Deserialize>::deserialize(deserializer)?;
            Self::from_bech32(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; 32] as serde::Deserialize>::deserialize(deserializer).map(Self)
        }
    }
}

impl schemars::JsonSchema for Address {
    fn schema_name() -> String {
        "Address".to_owned()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(gen)
    }
}
