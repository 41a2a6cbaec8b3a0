use thiserror::Error;

use helm_shared::{EntityId, MapId, PositionError, SessionKey};

use crate::{ControlError, LedgerError};

/// Inputs that cannot come from a conforming client. Every variant
/// disconnects the offending session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolViolation {
    /// An acknowledgment named an entity the session does not drive
    #[error("Session {session} acknowledged a change on {entity}, which it does not drive")]
    AckForUndrivenEntity { session: SessionKey, entity: EntityId },

    /// Too many movement messages named entities the session does not drive
    #[error("Session {session} sent {count} movement messages for entities it does not drive")]
    RepeatedUnauthorizedMoves { session: SessionKey, count: u32 },

    /// The acknowledgment did not match the oldest pending change
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The destination of a far teleport is outside the legal map space
    #[error("Far teleport destination of {entity} on map {map:?} is invalid")]
    InvalidTeleportDestination { entity: EntityId, map: MapId },
}

/// Reasons a message is discarded without penalising the sender
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropReason {
    #[error("Session is not registered")]
    UnknownSession,

    #[error("Session has been kicked and is awaiting disconnection")]
    SessionKicked,

    #[error("Entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("Session is not moving any entity")]
    NoActiveMover,

    /// The handoff's transitional spline has not come back yet
    #[error("Handoff of {0} is still waiting for its spline acknowledgment")]
    HandoffInProgress(EntityId),

    /// Under the tolerated limit of unauthorized reports
    #[error("Session does not drive entity {0}")]
    NotDriving(EntityId),

    #[error("Session was never offered control of {0}")]
    NotPendingMover(EntityId),

    #[error("Entity {0} is being teleported to another map")]
    FarTeleportInProgress(EntityId),

    #[error("Reported position is invalid: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("Transport report is {distance} units away from the stored position")]
    StaleTransportReport { distance: f32 },

    #[error("Transport offset exceeds the allowed bound")]
    TransportOffsetOutOfBounds,

    #[error("Entity {0} may not be moved by its client right now")]
    ClientControlRemoved(EntityId),

    #[error("Spline {received} does not complete the pending handoff (expected {expected:?})")]
    StaleSpline { expected: Option<u32>, received: u32 },

    #[error("Entity {0} is on a flight path")]
    InFlight(EntityId),

    #[error("Session lacks the permission for this command")]
    NotPrivileged,

    #[error("Entity {0} cannot accept a summon right now")]
    CannotBeSummoned(EntityId),

    #[error("Entity {0} has no far teleport in flight")]
    NoFarTeleportPending(EntityId),

    #[error("Teleport of {0} was refused: {1}")]
    TeleportRefused(EntityId, String),
}

/// Outcome of a message that was not accepted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("dropped: {0}")]
    Dropped(#[from] DropReason),

    #[error("protocol violation: {0}")]
    Violation(#[from] ProtocolViolation),
}

impl Rejection {
    pub fn is_violation(&self) -> bool {
        matches!(self, Rejection::Violation(_))
    }

    pub fn violation(&self) -> Option<&ProtocolViolation> {
        match self {
            Rejection::Violation(violation) => Some(violation),
            Rejection::Dropped(_) => None,
        }
    }
}

impl From<LedgerError> for Rejection {
    fn from(error: LedgerError) -> Self {
        Rejection::Violation(ProtocolViolation::Ledger(error))
    }
}

/// Errors returned from the server-side API used by the surrounding system
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HelmServerError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Entity {0} is not registered")]
    EntityNotRegistered(EntityId),

    #[error("Entity {0} is already registered")]
    EntityAlreadyRegistered(EntityId),

    #[error("Position is invalid: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("Speed {speed} is not a valid movement speed")]
    InvalidSpeed { speed: f32 },

    /// Cross-map teleports need a session whose player is the entity
    #[error("Entity {0} is not the player of any connected session")]
    NoOwningSession(EntityId),
}
