//! # Helm Shared
//! Movement reports, movement flags and the control/acknowledgment messages
//! exchanged between helm-server and the clients driving its entities.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod constants;
mod messages;
mod move_type;
mod movement_flags;
mod movement_info;
mod movement_opcode;
mod position;
mod types;

pub use constants::{
    ACK_TOLERANCE, MAP_HALF_SIZE, PET_TELEPORT_MARGIN, SIZE_OF_GRIDS, TRANSPORT_OFFSET_LIMIT,
};
pub use messages::{
    client_message::ClientMessage,
    server_message::{ServerMessage, ServerMessageKind},
};
pub use move_type::{FlagToggle, MoveType, MOVE_TYPE_COUNT};
pub use movement_flags::MovementFlags;
pub use movement_info::{JumpInfo, MovementInfo, TransportInfo};
pub use movement_opcode::MovementOpcode;
pub use position::{Position, PositionError, WorldLocation};
pub use types::{AreaId, EntityId, MapId, SessionKey, TransportId, ZoneId};
