use crate::{EntityId, MovementFlags, Position, TransportId};

/// Launch parameters of a jump or knockback
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JumpInfo {
    pub z_speed: f32,
    pub sin_angle: f32,
    pub cos_angle: f32,
    pub xy_speed: f32,
}

/// Transport the entity claims to be riding, with its offset from the transport origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportInfo {
    pub transport: TransportId,
    pub offset: Position,
    pub time: u32,
}

/// A client's belief about the motion of an entity it drives. Inbound copies
/// are transient; the server keeps one merged copy per entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementInfo {
    pub entity: EntityId,
    pub flags: MovementFlags,
    pub time: u32,
    pub position: Position,
    pub transport: Option<TransportInfo>,
    pub pitch: f32,
    pub fall_time: u32,
    pub jump: JumpInfo,
    pub spline_elevation: f32,
}

impl MovementInfo {
    pub fn new(entity: EntityId, position: Position) -> Self {
        Self {
            entity,
            flags: MovementFlags::empty(),
            time: 0,
            position,
            transport: None,
            pitch: 0.0,
            fall_time: 0,
            jump: JumpInfo::default(),
            spline_elevation: 0.0,
        }
    }

    pub fn has_flag(&self, flag: MovementFlags) -> bool {
        self.flags.intersects(flag)
    }

    pub fn is_jumping_or_falling(&self) -> bool {
        self.flags
            .intersects(MovementFlags::FALLING | MovementFlags::FALLING_FAR)
    }

    pub fn reset_transport(&mut self) {
        self.transport = None;
        self.flags.remove(MovementFlags::ON_TRANSPORT);
    }
}
