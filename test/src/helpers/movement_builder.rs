use helm_shared::{
    EntityId, JumpInfo, MovementFlags, MovementInfo, Position, TransportId, TransportInfo,
};

/// Fluent builder for client movement snapshots
pub struct MovementBuilder {
    info: MovementInfo,
}

impl MovementBuilder {
    pub fn new(entity: EntityId, x: f32, y: f32, z: f32) -> Self {
        Self {
            info: MovementInfo::new(entity, Position::new(x, y, z, 0.0)),
        }
    }

    pub fn at(entity: EntityId, position: Position) -> Self {
        Self {
            info: MovementInfo::new(entity, position),
        }
    }

    pub fn flags(mut self, flags: MovementFlags) -> Self {
        self.info.flags = flags;
        self
    }

    pub fn time(mut self, time: u32) -> Self {
        self.info.time = time;
        self
    }

    pub fn falling(mut self, fall_time: u32) -> Self {
        self.info.flags.insert(MovementFlags::FALLING);
        self.info.fall_time = fall_time;
        self
    }

    pub fn fall_time(mut self, fall_time: u32) -> Self {
        self.info.fall_time = fall_time;
        self
    }

    pub fn jump(mut self, jump: JumpInfo) -> Self {
        self.info.jump = jump;
        self
    }

    /// Rides `transport` at `offset` from its origin
    pub fn on_transport(mut self, transport: TransportId, offset: Position) -> Self {
        self.info.flags.insert(MovementFlags::ON_TRANSPORT);
        self.info.transport = Some(TransportInfo {
            transport,
            offset,
            time: 0,
        });
        self
    }

    pub fn build(self) -> MovementInfo {
        self.info
    }
}
