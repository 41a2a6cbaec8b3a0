use helm_shared::{EntityId, SessionKey};

use crate::ProtocolViolation;

/// Control bookkeeping for one connected session
#[derive(Clone, Debug)]
pub struct ControllerSession {
    key: SessionKey,
    player: EntityId,
    pub(crate) active_mover: Option<EntityId>,
    pub(crate) pending_mover: Option<EntityId>,
    pub(crate) pending_spline: Option<u32>,
    pub(crate) unauthorized_moves: u32,
    pub(crate) kicked: Option<ProtocolViolation>,
}

impl ControllerSession {
    pub fn new(key: SessionKey, player: EntityId) -> Self {
        Self {
            key,
            player,
            active_mover: None,
            pending_mover: None,
            pending_spline: None,
            unauthorized_moves: 0,
            kicked: None,
        }
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    /// The entity this session's player controls outside of handoffs
    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn active_mover(&self) -> Option<EntityId> {
        self.active_mover
    }

    pub fn pending_mover(&self) -> Option<EntityId> {
        self.pending_mover
    }

    pub fn pending_spline(&self) -> Option<u32> {
        self.pending_spline
    }

    pub fn unauthorized_moves(&self) -> u32 {
        self.unauthorized_moves
    }

    pub fn is_kicked(&self) -> bool {
        self.kicked.is_some()
    }

    pub fn kick_reason(&self) -> Option<&ProtocolViolation> {
        self.kicked.as_ref()
    }
}
