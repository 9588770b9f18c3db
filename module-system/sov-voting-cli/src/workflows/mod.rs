//! Workflows of the voting CLI

pub mod query;
pub mod state;
