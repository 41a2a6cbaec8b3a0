use thiserror::Error;

use helm_shared::EntityId;

use super::pending_change::ChangeFamily;

/// Errors raised while matching acknowledgments against the pending ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An acknowledgment arrived while nothing was outstanding
    #[error("Entity {entity} has no pending movement change, yet counter {received} was acknowledged")]
    UnsolicitedAcknowledgment { entity: EntityId, received: u32 },

    /// Acknowledgments must arrive in the order changes were issued
    #[error("Entity {entity} expected an acknowledgment for counter {expected}, received {received}")]
    CounterMismatch {
        entity: EntityId,
        expected: u32,
        received: u32,
    },

    #[error("Entity {entity} counter {counter} is a {expected:?} change, acknowledged as {received:?}")]
    KindMismatch {
        entity: EntityId,
        counter: u32,
        expected: ChangeFamily,
        received: ChangeFamily,
    },

    /// The acknowledged value differs from what was sent by more than the tolerance
    #[error("Entity {entity} counter {counter}: {field} was sent as {sent}, acknowledged as {received}")]
    PayloadMismatch {
        entity: EntityId,
        counter: u32,
        field: &'static str,
        sent: f32,
        received: f32,
    },

    /// Entries must be appended with increasing counters
    #[error("Entity {entity} counter {counter} does not follow {last}")]
    NonMonotonicCounter {
        entity: EntityId,
        counter: u32,
        last: u32,
    },
}
