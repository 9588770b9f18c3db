#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod clock;
mod config;
mod ledger;
mod receipt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{from_toml_path, load_genesis};
pub use ledger::{Ledger, VotingLedger};
pub use receipt::{CallReceipt, EventSubscriber};
