//! Common types shared across the module system.

mod address;
mod error;
mod prefix;

pub use address::{Address, HRP};
pub use error::{Bech32ParseError, ModuleError};
pub use prefix::{ModulePrefix, Prefix};
