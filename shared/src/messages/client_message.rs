use crate::{EntityId, FlagToggle, MoveType, MovementInfo, MovementOpcode, WorldLocation};

/// Every message a client may send to the movement layer, already
/// deserialized from the wire. All fields are attacker-controlled.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientMessage {
    /// Any movement report category
    Movement {
        opcode: MovementOpcode,
        info: MovementInfo,
    },
    /// The client took control of the entity it was granted
    SetActiveMover { entity: EntityId },
    /// The client gave up control of the entity it drives
    MoveNotActiveMover { info: MovementInfo },
    /// The client finished a server spline; completes a handoff
    SplineDone { entity: EntityId, spline_id: u32 },
    TeleportAck {
        entity: EntityId,
        counter: u32,
        time: u32,
    },
    SpeedChangeAck {
        entity: EntityId,
        counter: u32,
        move_type: MoveType,
        info: MovementInfo,
        speed: f32,
    },
    FlagChangeAck {
        entity: EntityId,
        counter: u32,
        toggle: FlagToggle,
        info: MovementInfo,
        apply: bool,
    },
    KnockBackAck {
        entity: EntityId,
        counter: u32,
        info: MovementInfo,
    },
    TimeSkipped { entity: EntityId, time_skipped: u32 },
    /// Privileged console teleport
    WorldTeleport { time: u32, location: WorldLocation },
    SummonResponse { summoner: EntityId, agree: bool },
    /// The client finished loading the destination of a far teleport
    WorldportAck,
}

impl ClientMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::Movement { opcode, .. } => opcode.name(),
            ClientMessage::SetActiveMover { .. } => "CMSG_SET_ACTIVE_MOVER",
            ClientMessage::MoveNotActiveMover { .. } => "CMSG_MOVE_NOT_ACTIVE_MOVER",
            ClientMessage::SplineDone { .. } => "CMSG_MOVE_SPLINE_DONE",
            ClientMessage::TeleportAck { .. } => "MSG_MOVE_TELEPORT_ACK",
            ClientMessage::SpeedChangeAck { .. } => "CMSG_FORCE_SPEED_CHANGE_ACK",
            ClientMessage::FlagChangeAck { .. } => "CMSG_MOVE_FLAG_CHANGE_ACK",
            ClientMessage::KnockBackAck { .. } => "CMSG_MOVE_KNOCK_BACK_ACK",
            ClientMessage::TimeSkipped { .. } => "CMSG_MOVE_TIME_SKIPPED",
            ClientMessage::WorldTeleport { .. } => "CMSG_WORLD_TELEPORT",
            ClientMessage::SummonResponse { .. } => "CMSG_SUMMON_RESPONSE",
            ClientMessage::WorldportAck => "MSG_MOVE_WORLDPORT_ACK",
        }
    }

    /// The entity this message claims to concern, if it names one
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            ClientMessage::Movement { info, .. } => Some(info.entity),
            ClientMessage::MoveNotActiveMover { info } => Some(info.entity),
            ClientMessage::SetActiveMover { entity }
            | ClientMessage::SplineDone { entity, .. }
            | ClientMessage::TeleportAck { entity, .. }
            | ClientMessage::SpeedChangeAck { entity, .. }
            | ClientMessage::FlagChangeAck { entity, .. }
            | ClientMessage::KnockBackAck { entity, .. }
            | ClientMessage::TimeSkipped { entity, .. } => Some(*entity),
            ClientMessage::WorldTeleport { .. }
            | ClientMessage::SummonResponse { .. }
            | ClientMessage::WorldportAck => None,
        }
    }

    /// The ledger counter carried by acknowledgment messages
    pub fn counter(&self) -> Option<u32> {
        match self {
            ClientMessage::TeleportAck { counter, .. }
            | ClientMessage::SpeedChangeAck { counter, .. }
            | ClientMessage::FlagChangeAck { counter, .. }
            | ClientMessage::KnockBackAck { counter, .. } => Some(*counter),
            _ => None,
        }
    }

    pub fn is_acknowledgment(&self) -> bool {
        self.counter().is_some()
    }
}
