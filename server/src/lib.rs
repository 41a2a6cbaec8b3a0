//! # Helm Server
//! Decides which session may drive a movable entity, validates and relays
//! the movement reports that session sends, and runs the request /
//! acknowledge protocol for every movement property the server changes.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use helm_shared::{
        AreaId, ClientMessage, EntityId, FlagToggle, JumpInfo, MapId, MoveType, MovementFlags,
        MovementInfo, MovementOpcode, Position, ServerMessage, ServerMessageKind, SessionKey,
        TransportId, TransportInfo, WorldLocation, ZoneId,
    };
}

mod control;
mod dispatch;
mod error;
mod events;
mod ledger;
mod mover;
mod server;
mod world;

pub use control::{
    control_map::{Activation, Authorization, ControlMap},
    control_state::ControlState,
    error::ControlError,
    session::ControllerSession,
};
pub use error::{DropReason, HelmServerError, ProtocolViolation, Rejection};
pub use events::{
    movement_events::{
        DrainEvent, FarTeleportEvent, HandoffEvent, KickEvent, MovementEvent, MovementEvents,
        OutOfBoundsEvent, RecallEvent, ResolveEvent,
    },
    outbox::Outbox,
};
pub use ledger::{
    change_ledger::ChangeLedger,
    error::LedgerError,
    pending_change::{AckPayload, ChangeFamily, ChangeKind, PendingChange},
};
pub use mover::{
    movable_entity::{MovableEntity, MoverKind, TeleportState},
    mover_store::MoverStore,
};
pub use server::{movement_server::MovementServer, server_config::ServerConfig};
pub use world::{
    anti_cheat::{AntiCheat, NoopAntiCheat},
    movement_world::{DamageKind, FallReport, MapEntryError, MovementWorld},
};
