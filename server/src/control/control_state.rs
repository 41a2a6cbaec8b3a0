/// Where a (session, entity) pair stands in the handoff lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    /// The session has no claim on the entity
    Unassigned,
    /// Control was offered; the client has not taken it yet
    PendingHandoff,
    /// The session drives the entity but the stop spline sent on handoff has
    /// not come back
    Transitioning { spline_id: u32 },
    /// The session drives the entity
    Active,
}

impl ControlState {
    pub fn is_driving(&self) -> bool {
        matches!(self, ControlState::Transitioning { .. } | ControlState::Active)
    }

    /// Movement reports and acknowledgments are only applied in this state
    pub fn can_move(&self) -> bool {
        matches!(self, ControlState::Active)
    }

    pub fn can_take_control(&self) -> bool {
        matches!(self, ControlState::PendingHandoff)
    }
}
