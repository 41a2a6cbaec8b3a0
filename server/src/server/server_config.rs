use std::default::Default;

use helm_shared::{ACK_TOLERANCE, PET_TELEPORT_MARGIN, SIZE_OF_GRIDS, TRANSPORT_OFFSET_LIMIT};

/// Contains Config properties which will be used by the MovementServer
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Absolute tolerance when comparing acknowledged speeds and knockback
    /// components with the values that were sent
    pub ack_tolerance: f32,
    /// Largest transport-relative offset accepted on any axis
    pub transport_offset_limit: f32,
    /// Transport reports farther than this from the stored position are
    /// leftovers from before a teleport and are skipped
    pub transport_skip_distance: f32,
    /// Pets farther than (visibility range - margin) follow their owner on teleport
    pub pet_teleport_margin: f32,
    /// How many reports for an entity the session does not drive are
    /// tolerated before the session is disconnected
    pub unauthorized_move_limit: u32,
    /// Whether protocol violations disconnect the session. Turning this off
    /// only records the violation.
    pub kick_on_violation: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ack_tolerance: ACK_TOLERANCE,
            transport_offset_limit: TRANSPORT_OFFSET_LIMIT,
            transport_skip_distance: SIZE_OF_GRIDS,
            pet_teleport_margin: PET_TELEPORT_MARGIN,
            unauthorized_move_limit: 3,
            kick_on_violation: true,
        }
    }
}
