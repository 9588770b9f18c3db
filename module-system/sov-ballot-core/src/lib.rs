#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod common;
pub mod containers;
pub mod module;
pub mod storage;
pub mod utils;

pub use common::*;
pub use containers::*;
pub use module::*;
pub use storage::*;
