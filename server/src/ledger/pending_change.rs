use helm_shared::{EntityId, FlagToggle, JumpInfo, MoveType, MovementInfo, Position, ServerMessage};

use super::error::LedgerError;

/// What the server changed and is waiting for the driving client to ratify
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChangeKind {
    Speed { move_type: MoveType, speed: f32 },
    FlagToggle { toggle: FlagToggle, apply: bool },
    KnockBack { jump: JumpInfo },
    /// Same-map teleport
    Teleport { destination: Position },
}

/// Coarse kind used to pair an acknowledgment with the change it answers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeFamily {
    Speed(MoveType),
    Flag(FlagToggle),
    KnockBack,
    Teleport,
}

/// Values carried by an acknowledgment, checked against the pending change
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AckPayload {
    Speed { move_type: MoveType, speed: f32 },
    Flag { toggle: FlagToggle, apply: bool },
    KnockBack { jump: JumpInfo },
    Teleport,
}

impl ChangeKind {
    pub fn family(&self) -> ChangeFamily {
        match self {
            ChangeKind::Speed { move_type, .. } => ChangeFamily::Speed(*move_type),
            ChangeKind::FlagToggle { toggle, .. } => ChangeFamily::Flag(*toggle),
            ChangeKind::KnockBack { .. } => ChangeFamily::KnockBack,
            ChangeKind::Teleport { .. } => ChangeFamily::Teleport,
        }
    }
}

impl AckPayload {
    pub fn family(&self) -> ChangeFamily {
        match self {
            AckPayload::Speed { move_type, .. } => ChangeFamily::Speed(*move_type),
            AckPayload::Flag { toggle, .. } => ChangeFamily::Flag(*toggle),
            AckPayload::KnockBack { .. } => ChangeFamily::KnockBack,
            AckPayload::Teleport => ChangeFamily::Teleport,
        }
    }
}

/// One outstanding server-initiated change, identified by its counter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingChange {
    pub counter: u32,
    pub kind: ChangeKind,
}

impl PendingChange {
    pub fn new(counter: u32, kind: ChangeKind) -> Self {
        Self { counter, kind }
    }

    pub fn family(&self) -> ChangeFamily {
        self.kind.family()
    }

    /// Checks the acknowledged values against the ones that were sent. The
    /// family must already match.
    pub fn verify_payload(
        &self,
        entity: EntityId,
        payload: &AckPayload,
        tolerance: f32,
    ) -> Result<(), LedgerError> {
        let mismatch = |field: &'static str, sent: f32, received: f32| {
            LedgerError::PayloadMismatch {
                entity,
                counter: self.counter,
                field,
                sent,
                received,
            }
        };

        match (&self.kind, payload) {
            (ChangeKind::Speed { speed: sent, .. }, AckPayload::Speed { speed, .. }) => {
                if !within(*sent, *speed, tolerance) {
                    return Err(mismatch("speed", *sent, *speed));
                }
            }
            (
                ChangeKind::FlagToggle { apply: sent, .. },
                AckPayload::Flag { apply: received, .. },
            ) => {
                if sent != received {
                    return Err(mismatch("apply", bool_value(*sent), bool_value(*received)));
                }
            }
            (ChangeKind::KnockBack { jump: sent }, AckPayload::KnockBack { jump }) => {
                let pairs = [
                    ("z_speed", sent.z_speed, jump.z_speed),
                    ("sin_angle", sent.sin_angle, jump.sin_angle),
                    ("cos_angle", sent.cos_angle, jump.cos_angle),
                    ("xy_speed", sent.xy_speed, jump.xy_speed),
                ];
                for (field, sent, received) in pairs {
                    if !within(sent, received, tolerance) {
                        return Err(mismatch(field, sent, received));
                    }
                }
            }
            (ChangeKind::Teleport { .. }, AckPayload::Teleport) => {}
            _ => {
                return Err(LedgerError::KindMismatch {
                    entity,
                    counter: self.counter,
                    expected: self.family(),
                    received: payload.family(),
                });
            }
        }

        Ok(())
    }

    /// Instruction sent to the driving client. `info` is the entity's
    /// canonical snapshot, relocated for teleports.
    pub fn instruction(&self, entity: EntityId, info: &MovementInfo) -> ServerMessage {
        let counter = self.counter;
        match self.kind {
            ChangeKind::Speed { move_type, speed } => ServerMessage::ForceSpeedChange {
                entity,
                counter,
                move_type,
                speed,
            },
            ChangeKind::FlagToggle { toggle, apply } => ServerMessage::MovementFlagChange {
                entity,
                counter,
                toggle,
                apply,
            },
            ChangeKind::KnockBack { jump } => ServerMessage::MoveKnockBack {
                entity,
                counter,
                jump,
            },
            ChangeKind::Teleport { destination } => {
                let mut info = *info;
                info.position = destination;
                ServerMessage::MoveTeleport {
                    entity,
                    counter,
                    info,
                }
            }
        }
    }
}

/// Absolute comparison with a few ulps of slack, so values written exactly
/// `tolerance` apart (10.00 and 9.99) still match after f32 rounding. NaN
/// never matches.
fn within(sent: f32, received: f32, tolerance: f32) -> bool {
    let slack = f32::EPSILON * sent.abs().max(received.abs()).max(1.0) * 4.0;
    (sent - received).abs() <= tolerance + slack
}

fn bool_value(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
