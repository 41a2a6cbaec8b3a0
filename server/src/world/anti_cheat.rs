use helm_shared::{EntityId, MovementInfo, MovementOpcode, SessionKey};

use crate::ProtocolViolation;

/// Observer notified about accepted movement and suspicious input. The
/// movement layer only reports; any penalty beyond disconnection is the
/// implementor's decision.
pub trait AntiCheat {
    /// A movement report passed validation and was merged
    fn on_report(&mut self, session: SessionKey, opcode: MovementOpcode, info: &MovementInfo);

    /// The entity driven by `session` changed
    fn on_handoff_changed(
        &mut self,
        session: SessionKey,
        previous: Option<EntityId>,
        current: Option<EntityId>,
    );

    /// A knockback was acknowledged and resolved
    fn on_knockback(&mut self, session: SessionKey, entity: EntityId);

    /// The session sent movement for an entity it does not drive
    fn on_unauthorized_move(&mut self, session: SessionKey, entity: EntityId);

    /// The session committed a protocol violation
    fn on_violation(&mut self, session: SessionKey, violation: &ProtocolViolation);
}

/// AntiCheat that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAntiCheat;

impl AntiCheat for NoopAntiCheat {
    fn on_report(&mut self, _: SessionKey, _: MovementOpcode, _: &MovementInfo) {}

    fn on_handoff_changed(&mut self, _: SessionKey, _: Option<EntityId>, _: Option<EntityId>) {}

    fn on_knockback(&mut self, _: SessionKey, _: EntityId) {}

    fn on_unauthorized_move(&mut self, _: SessionKey, _: EntityId) {}

    fn on_violation(&mut self, _: SessionKey, _: &ProtocolViolation) {}
}
