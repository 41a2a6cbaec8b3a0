use thiserror::Error;

use helm_shared::{
    AreaId, EntityId, MapId, Position, SessionKey, TransportId, WorldLocation, ZoneId,
};

/// Why entering a map failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapEntryError {
    #[error("Map {0:?} could not be created")]
    MapUnavailable(MapId),

    #[error("Entity {entity} was refused entry to map {map:?}")]
    EntryRefused { entity: EntityId, map: MapId },
}

/// Environmental damage the movement layer may apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageKind {
    /// Fell below the lowest legal height of the map
    FallToVoid,
}

/// Landing details handed to fall-damage computation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallReport {
    pub entity: EntityId,
    /// Height where the fall started
    pub start_z: f32,
    /// Height where the entity landed
    pub land_z: f32,
    pub fall_time: u32,
}

/// Everything the movement layer needs from the simulation around it: map
/// geometry, visibility, transports, unit state and the side effects that
/// accepted movement causes.
pub trait MovementWorld {
    // Map geometry

    /// Whether `position` is a legal coordinate on `map`
    fn is_valid_map_coord(&self, map: MapId, position: &Position) -> bool {
        position.is_valid() && self.map_exists(map)
    }

    fn map_exists(&self, map: MapId) -> bool;

    fn is_under_water(&self, map: MapId, position: &Position) -> bool;

    /// Lowest legal height at (x, y). Below it the entity is out of bounds.
    fn min_height(&self, map: MapId, x: f32, y: f32) -> f32;

    /// Terrain height at (x, y)
    fn ground_height(&self, map: MapId, x: f32, y: f32) -> f32;

    fn visibility_range(&self, map: MapId) -> f32;

    fn zone_and_area(&self, map: MapId, position: &Position) -> (ZoneId, AreaId);

    // Visibility

    /// Sessions that currently see `entity`. May include its driver.
    fn observers(&self, entity: EntityId) -> Vec<SessionKey>;

    // Transports

    fn transport_exists(&self, map: MapId, transport: TransportId) -> bool;

    /// Static transports (elevators) do not suppress fall handling
    fn is_static_transport(&self, transport: TransportId) -> bool;

    /// Absolute position of a passenger at `offset` on `transport`
    fn passenger_position(&self, transport: TransportId, offset: &Position) -> Position;

    /// Offset from `transport` of the absolute `position`
    fn passenger_offset(&self, transport: TransportId, position: &Position) -> Position;

    fn board_transport(&mut self, entity: EntityId, transport: TransportId);

    fn leave_transport(&mut self, entity: EntityId, transport: TransportId);

    // Unit state

    fn is_alive(&self, entity: EntityId) -> bool;

    fn is_in_flight(&self, entity: EntityId) -> bool;

    fn is_in_combat(&self, entity: EntityId) -> bool;

    /// Free to move: not rooted, stunned or otherwise held by the server
    fn can_free_move(&self, entity: EntityId) -> bool;

    /// Client control is currently withdrawn (charmed, feared, ...)
    fn is_client_control_blocked(&self, entity: EntityId) -> bool;

    fn is_standing(&self, entity: EntityId) -> bool;

    fn stand_up(&mut self, entity: EntityId);

    fn health(&self, entity: EntityId) -> u32;

    // Side effects of accepted movement

    /// Flags the entity as having moved this tick
    fn mark_moved(&mut self, entity: EntityId);

    fn handle_fall(&mut self, fall: &FallReport);

    fn environmental_damage(&mut self, entity: EntityId, kind: DamageKind, amount: u32);

    fn kill(&mut self, entity: EntityId);

    fn update_zone(&mut self, entity: EntityId, zone: ZoneId, area: AreaId);

    /// Zone-dependent rules (PvP state and the like) need re-evaluation
    fn on_zone_changed(&mut self, entity: EntityId, old: ZoneId, new: ZoneId);

    /// The entity's pet and where it stands
    fn pet_of(&self, entity: EntityId) -> Option<(EntityId, Position)>;

    fn relocate_pet(&mut self, pet: EntityId, position: &Position);

    /// Brings back a pet that was dismissed for a teleport
    fn resummon_pet(&mut self, entity: EntityId);

    /// Runs operations that were deferred until the entity finished teleporting
    fn process_delayed_operations(&mut self, entity: EntityId);

    /// Restarts the entity's motion generators after a teleport
    fn reinitialize_motion(&mut self, entity: EntityId);

    // Far teleport

    fn enter_map(&mut self, entity: EntityId, location: &WorldLocation) -> Result<(), MapEntryError>;

    fn homebind(&self, entity: EntityId) -> WorldLocation;

    /// Seconds until the instance at `map` resets, when the entity enters it
    /// without being bound to it
    fn instance_reset_warning(&self, entity: EntityId, map: MapId) -> Option<u32>;

    /// Arrival side effects that belong to the map (battlegrounds,
    /// resurrection, flight paths)
    fn on_map_entered(&mut self, entity: EntityId, map: MapId);

    // Commands

    fn can_world_teleport(&self, session: SessionKey) -> bool;

    fn summon_if_possible(&mut self, entity: EntityId, summoner: EntityId, agree: bool);
}
