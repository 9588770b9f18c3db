use serde::{Deserialize, Serialize};

/// The outcome of a committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt<E> {
    /// Position of the call among the calls committed by this ledger.
    pub sequence: u64,
    /// Clock reading the call was applied at.
    pub timestamp: u64,
    /// Events emitted by the call, in emission order.
    pub events: Vec<E>,
}

/// Receives the events of committed calls.
///
/// Subscribers run while the ledger holds its write lock: they observe calls
/// in commit order and must not call back into the ledger.
pub trait EventSubscriber<E>: Send + Sync {
    /// Called once per event of the call committed with number `sequence`.
    fn on_event(&self, sequence: u64, event: &E);
}

impl<E, F> EventSubscriber<E> for F
where
    F: Fn(u64, &E) + Send + Sync,
{
    fn on_event(&self, sequence: u64, event: &E) {
        self(sequence, event)
    }
}
