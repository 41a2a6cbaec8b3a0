use crate::{
    EntityId, FlagToggle, JumpInfo, MapId, MoveType, MovementInfo, MovementOpcode, Position,
    WorldLocation,
};

/// Every message the movement layer sends, either to the driving client of an
/// entity (instructions carrying a counter) or to its observers (relays)
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Merged snapshot relayed to observers, tagged with the report category
    MovementRelay {
        opcode: MovementOpcode,
        info: MovementInfo,
    },
    /// Grants or revokes the right to drive an entity
    ClientControlUpdate { entity: EntityId, allow_move: bool },
    /// Zero-length spline holding the entity in place; sent on handoff
    MoveSplineStop {
        entity: EntityId,
        spline_id: u32,
        position: Position,
    },
    ForceSpeedChange {
        entity: EntityId,
        counter: u32,
        move_type: MoveType,
        speed: f32,
    },
    SpeedChanged {
        entity: EntityId,
        move_type: MoveType,
        speed: f32,
    },
    MovementFlagChange {
        entity: EntityId,
        counter: u32,
        toggle: FlagToggle,
        apply: bool,
    },
    MovementFlagChanged {
        entity: EntityId,
        toggle: FlagToggle,
        apply: bool,
    },
    MoveKnockBack {
        entity: EntityId,
        counter: u32,
        jump: JumpInfo,
    },
    KnockedBack { entity: EntityId, jump: JumpInfo },
    MoveTeleport {
        entity: EntityId,
        counter: u32,
        info: MovementInfo,
    },
    /// Canonical teleport seen by observers once the driver acknowledged it
    Teleported { info: MovementInfo },
    TransferPending { map: MapId },
    NewWorld { location: WorldLocation },
    TimeSkippedRelay { entity: EntityId, time_skipped: u32 },
    /// Zone reset warning sent when entering a raid instance without a binding
    InstanceResetWarning { map: MapId, time_left: u32 },
}

/// Discriminant of [`ServerMessage`], handy for filtering an outbox
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerMessageKind {
    MovementRelay,
    ClientControlUpdate,
    MoveSplineStop,
    ForceSpeedChange,
    SpeedChanged,
    MovementFlagChange,
    MovementFlagChanged,
    MoveKnockBack,
    KnockedBack,
    MoveTeleport,
    Teleported,
    TransferPending,
    NewWorld,
    TimeSkippedRelay,
    InstanceResetWarning,
}

impl ServerMessage {
    pub fn kind(&self) -> ServerMessageKind {
        match self {
            ServerMessage::MovementRelay { .. } => ServerMessageKind::MovementRelay,
            ServerMessage::ClientControlUpdate { .. } => ServerMessageKind::ClientControlUpdate,
            ServerMessage::MoveSplineStop { .. } => ServerMessageKind::MoveSplineStop,
            ServerMessage::ForceSpeedChange { .. } => ServerMessageKind::ForceSpeedChange,
            ServerMessage::SpeedChanged { .. } => ServerMessageKind::SpeedChanged,
            ServerMessage::MovementFlagChange { .. } => ServerMessageKind::MovementFlagChange,
            ServerMessage::MovementFlagChanged { .. } => ServerMessageKind::MovementFlagChanged,
            ServerMessage::MoveKnockBack { .. } => ServerMessageKind::MoveKnockBack,
            ServerMessage::KnockedBack { .. } => ServerMessageKind::KnockedBack,
            ServerMessage::MoveTeleport { .. } => ServerMessageKind::MoveTeleport,
            ServerMessage::Teleported { .. } => ServerMessageKind::Teleported,
            ServerMessage::TransferPending { .. } => ServerMessageKind::TransferPending,
            ServerMessage::NewWorld { .. } => ServerMessageKind::NewWorld,
            ServerMessage::TimeSkippedRelay { .. } => ServerMessageKind::TimeSkippedRelay,
            ServerMessage::InstanceResetWarning { .. } => ServerMessageKind::InstanceResetWarning,
        }
    }

    /// The counter of instructions that must be acknowledged
    pub fn counter(&self) -> Option<u32> {
        match self {
            ServerMessage::ForceSpeedChange { counter, .. }
            | ServerMessage::MovementFlagChange { counter, .. }
            | ServerMessage::MoveKnockBack { counter, .. }
            | ServerMessage::MoveTeleport { counter, .. } => Some(*counter),
            _ => None,
        }
    }
}
