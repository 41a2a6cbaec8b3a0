use helm_server::{AntiCheat, ProtocolViolation};
use helm_shared::{EntityId, MovementInfo, MovementOpcode, SessionKey};

/// AntiCheat that remembers every notification
#[derive(Default)]
pub struct RecordingAntiCheat {
    pub reports: Vec<(SessionKey, MovementOpcode, MovementInfo)>,
    pub handoffs: Vec<(SessionKey, Option<EntityId>, Option<EntityId>)>,
    pub knockbacks: Vec<(SessionKey, EntityId)>,
    pub unauthorized: Vec<(SessionKey, EntityId)>,
    pub violations: Vec<(SessionKey, ProtocolViolation)>,
}

impl AntiCheat for RecordingAntiCheat {
    fn on_report(&mut self, session: SessionKey, opcode: MovementOpcode, info: &MovementInfo) {
        self.reports.push((session, opcode, *info));
    }

    fn on_handoff_changed(
        &mut self,
        session: SessionKey,
        previous: Option<EntityId>,
        current: Option<EntityId>,
    ) {
        self.handoffs.push((session, previous, current));
    }

    fn on_knockback(&mut self, session: SessionKey, entity: EntityId) {
        self.knockbacks.push((session, entity));
    }

    fn on_unauthorized_move(&mut self, session: SessionKey, entity: EntityId) {
        self.unauthorized.push((session, entity));
    }

    fn on_violation(&mut self, session: SessionKey, violation: &ProtocolViolation) {
        self.violations.push((session, violation.clone()));
    }
}
