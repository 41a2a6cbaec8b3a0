use helm_shared::{
    AreaId, EntityId, FlagToggle, MapId, MoveType, MovementFlags, MovementInfo, Position,
    TransportId, WorldLocation, ZoneId, MOVE_TYPE_COUNT,
};

use crate::ChangeLedger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoverKind {
    /// Owned by a session; may far teleport
    Player,
    Creature,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TeleportState {
    Idle,
    /// Same-map teleport waiting for its acknowledgment
    NearPending { destination: Position },
    /// Cross-map teleport waiting for the client to load the destination
    FarPending { location: WorldLocation },
}

/// Server-side truth for one entity that can be driven by a client
pub struct MovableEntity {
    id: EntityId,
    kind: MoverKind,
    map: MapId,
    zone: ZoneId,
    area: AreaId,
    info: MovementInfo,
    speed_rates: [f32; MOVE_TYPE_COUNT],
    capabilities: MovementFlags,
    transport: Option<TransportId>,
    in_water: bool,
    fall_start_z: f32,
    last_fall_time: u32,
    safe_position: Option<Position>,
    out_of_bounds: bool,
    teleport: TeleportState,
    pub(crate) ledger: ChangeLedger,
}

impl MovableEntity {
    pub fn new(id: EntityId, kind: MoverKind, location: WorldLocation) -> Self {
        Self {
            id,
            kind,
            map: location.map,
            zone: ZoneId(0),
            area: AreaId(0),
            info: MovementInfo::new(id, location.position),
            speed_rates: [1.0; MOVE_TYPE_COUNT],
            capabilities: MovementFlags::empty(),
            transport: None,
            in_water: false,
            fall_start_z: location.position.z,
            last_fall_time: 0,
            safe_position: None,
            out_of_bounds: false,
            teleport: TeleportState::Idle,
            ledger: ChangeLedger::new(id),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> MoverKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.kind == MoverKind::Player
    }

    pub fn map(&self) -> MapId {
        self.map
    }

    pub fn location(&self) -> WorldLocation {
        WorldLocation::new(self.map, self.info.position)
    }

    pub fn position(&self) -> &Position {
        &self.info.position
    }

    pub fn zone(&self) -> (ZoneId, AreaId) {
        (self.zone, self.area)
    }

    pub fn movement_info(&self) -> &MovementInfo {
        &self.info
    }

    pub fn ledger(&self) -> &ChangeLedger {
        &self.ledger
    }

    pub fn speed_rate(&self, move_type: MoveType) -> f32 {
        self.speed_rates[move_type.index()]
    }

    pub fn speed(&self, move_type: MoveType) -> f32 {
        self.speed_rate(move_type) * move_type.base_speed()
    }

    pub fn has_capability(&self, toggle: FlagToggle) -> bool {
        self.capabilities.contains(toggle.movement_flag())
    }

    pub fn capabilities(&self) -> MovementFlags {
        self.capabilities
    }

    pub fn transport(&self) -> Option<TransportId> {
        self.transport
    }

    pub fn is_in_water(&self) -> bool {
        self.in_water
    }

    pub fn fall_information(&self) -> (u32, f32) {
        (self.last_fall_time, self.fall_start_z)
    }

    pub fn safe_position(&self) -> Option<&Position> {
        self.safe_position.as_ref()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.out_of_bounds
    }

    pub fn teleport_state(&self) -> &TeleportState {
        &self.teleport
    }

    pub fn is_being_teleported_far(&self) -> bool {
        matches!(self.teleport, TeleportState::FarPending { .. })
    }

    // Crate-public

    pub(crate) fn set_zone(&mut self, zone: ZoneId, area: AreaId) {
        self.zone = zone;
        self.area = area;
    }

    pub(crate) fn set_map(&mut self, map: MapId) {
        self.map = map;
    }

    pub(crate) fn set_speed_rate(&mut self, move_type: MoveType, rate: f32) {
        self.speed_rates[move_type.index()] = rate;
    }

    pub(crate) fn set_capability(&mut self, toggle: FlagToggle, apply: bool) {
        self.capabilities.set(toggle.movement_flag(), apply);
    }

    /// Knockbacks take away flight until it is granted again
    pub(crate) fn strip_flight(&mut self) {
        self.capabilities.remove(MovementFlags::CAN_FLY);
        self.info
            .flags
            .remove(MovementFlags::CAN_FLY | MovementFlags::PLAYER_FLYING);
    }

    pub(crate) fn set_movement_flag(&mut self, flag: MovementFlags, apply: bool) {
        self.info.flags.set(flag, apply);
    }

    pub(crate) fn set_transport(&mut self, transport: Option<TransportId>) {
        self.transport = transport;
    }

    pub(crate) fn set_in_water(&mut self, in_water: bool) {
        self.in_water = in_water;
    }

    pub(crate) fn set_fall_information(&mut self, time: u32, z: f32) {
        self.last_fall_time = time;
        self.fall_start_z = z;
    }

    pub(crate) fn save_safe_position(&mut self, position: Position) {
        self.safe_position = Some(position);
    }

    pub(crate) fn set_out_of_bounds(&mut self, out_of_bounds: bool) {
        self.out_of_bounds = out_of_bounds;
    }

    pub(crate) fn set_teleport_state(&mut self, state: TeleportState) {
        self.teleport = state;
    }

    /// Replaces the canonical snapshot with a validated client report
    pub(crate) fn update_movement_info(&mut self, info: &MovementInfo) {
        self.info = *info;
        self.info.entity = self.id;
    }

    pub(crate) fn relocate(&mut self, position: &Position) {
        self.info.position.relocate(position);
    }

    /// Clears any motion so the entity stays where it is
    pub(crate) fn stop_moving(&mut self) {
        self.info
            .flags
            .remove(MovementFlags::MASK_MOVING | MovementFlags::MASK_TURNING);
    }
}
