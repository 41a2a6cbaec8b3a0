use thiserror::Error;

use helm_shared::{EntityId, SessionKey};

/// Errors that can occur while assigning or moving control of entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// Attempted to register a session that is already registered
    #[error("Session {session} is already registered")]
    SessionAlreadyRegistered { session: SessionKey },

    /// Session must be registered before this operation
    #[error("Session {session} is not registered (during {operation})")]
    SessionNotRegistered {
        session: SessionKey,
        operation: &'static str,
    },

    /// The session was kicked and awaits disconnection
    #[error("Session {session} has been kicked")]
    SessionKicked { session: SessionKey },

    /// The world forbids client control of the entity right now
    #[error("Entity {entity} cannot be controlled by a client right now")]
    ControlForbidden { entity: EntityId },

    /// The session tried to take an entity it was never offered
    #[error("Session {session} was not offered control of {entity}")]
    NotPendingMover { session: SessionKey, entity: EntityId },

    /// A spline completion did not match the handoff in progress
    #[error("Session {session} completed spline {received} on {entity}, expected {expected:?}")]
    TransitionMismatch {
        session: SessionKey,
        entity: EntityId,
        expected: Option<u32>,
        received: u32,
    },
}
