use log::{debug, error, info, warn};

use helm_shared::{
    EntityId, FlagToggle, JumpInfo, MoveType, Position, ServerMessage, SessionKey,
    WorldLocation,
};

use crate::{
    AntiCheat, ChangeKind, DropReason, HelmServerError, MovementServer, MovementWorld,
    ProtocolViolation, Rejection, TeleportState,
};

impl<A: AntiCheat> MovementServer<A> {
    /// Changes a movement property of `entity`. The server-side value changes
    /// immediately. A driven entity's client is sent an instruction and the
    /// change stays pending until acknowledged; an entity nobody drives has
    /// the change applied and broadcast at once.
    ///
    /// Returns the ledger counter when an acknowledgment is expected.
    pub fn enqueue_change<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        kind: ChangeKind,
    ) -> Result<Option<u32>, HelmServerError> {
        let driver = self.control.driver_of(&entity);
        let mover = self.movers.try_get_mut(&entity)?;

        match kind {
            ChangeKind::Speed { move_type, speed } => {
                if !speed.is_finite() || speed < 0.0 {
                    return Err(HelmServerError::InvalidSpeed { speed });
                }
                mover.set_speed_rate(move_type, speed / move_type.base_speed());
            }
            ChangeKind::FlagToggle { toggle, apply } => mover.set_capability(toggle, apply),
            ChangeKind::KnockBack { .. } => {}
            ChangeKind::Teleport { destination } => {
                destination.validate()?;
                mover.set_teleport_state(TeleportState::NearPending { destination });
            }
        }

        let Some(driver) = driver else {
            self.apply_undriven(world, &entity, kind);
            return Ok(None);
        };

        let change = mover.ledger.push(kind);
        if self.control.state(&driver, &entity).can_move() {
            let info = *mover.movement_info();
            self.outbox.push(driver, change.instruction(entity, &info));
        } else {
            debug!(
                "holding counter {} for {} until its handoff settles",
                change.counter, entity
            );
        }
        Ok(Some(change.counter))
    }

    /// Sets the speed of one movement category as a multiple of its base speed
    pub fn set_speed_rate<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        move_type: MoveType,
        rate: f32,
    ) -> Result<Option<u32>, HelmServerError> {
        let speed = rate * move_type.base_speed();
        self.enqueue_change(world, entity, ChangeKind::Speed { move_type, speed })
    }

    pub fn set_movement_flag<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        toggle: FlagToggle,
        apply: bool,
    ) -> Result<Option<u32>, HelmServerError> {
        self.enqueue_change(world, entity, ChangeKind::FlagToggle { toggle, apply })
    }

    pub fn knock_back<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        jump: JumpInfo,
    ) -> Result<Option<u32>, HelmServerError> {
        self.enqueue_change(world, entity, ChangeKind::KnockBack { jump })
    }

    /// Same-map teleport
    pub fn teleport_near<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        destination: Position,
    ) -> Result<Option<u32>, HelmServerError> {
        self.enqueue_change(world, entity, ChangeKind::Teleport { destination })
    }

    /// Teleports to any location, crossing maps when needed
    pub fn teleport_to<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: EntityId,
        location: WorldLocation,
    ) -> Result<Option<u32>, HelmServerError> {
        let mover = self.movers.try_get(&entity)?;
        if mover.map() == location.map {
            return self.teleport_near(world, entity, location.position);
        }
        self.teleport_far(entity, location)?;
        Ok(None)
    }

    /// Starts a cross-map teleport. The owning client is told to load the
    /// destination and answers with a worldport acknowledgment.
    pub fn teleport_far(
        &mut self,
        entity: EntityId,
        location: WorldLocation,
    ) -> Result<(), HelmServerError> {
        let owner = self
            .control
            .sessions()
            .find(|record| record.player() == entity && !record.is_kicked())
            .map(|record| record.key())
            .ok_or(HelmServerError::NoOwningSession(entity))?;

        // changes on the old map can no longer be acknowledged
        self.drain_ledger(&entity);

        let mover = self.movers.try_get_mut(&entity)?;
        mover.set_teleport_state(TeleportState::FarPending { location });

        self.outbox.push(owner, ServerMessage::TransferPending { map: location.map });
        self.outbox.push(owner, ServerMessage::NewWorld { location });
        info!("{} is being teleported to map {:?}", entity, location.map);
        Ok(())
    }

    fn apply_undriven<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: &EntityId,
        kind: ChangeKind,
    ) {
        let message = match kind {
            ChangeKind::Speed { move_type, speed } => ServerMessage::SpeedChanged {
                entity: *entity,
                move_type,
                speed,
            },
            ChangeKind::FlagToggle { toggle, apply } => {
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.set_movement_flag(toggle.movement_flag(), apply);
                }
                ServerMessage::MovementFlagChanged {
                    entity: *entity,
                    toggle,
                    apply,
                }
            }
            ChangeKind::KnockBack { jump } => {
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.strip_flight();
                }
                ServerMessage::KnockedBack {
                    entity: *entity,
                    jump,
                }
            }
            ChangeKind::Teleport { destination } => {
                self.complete_near_teleport(world, entity, destination, None);
                return;
            }
        };
        self.broadcast(world, entity, None, message);
    }

    /// Moves the entity to `destination` and brings everything that depends
    /// on its position up to date. `driver` already knows and is not told.
    pub(crate) fn complete_near_teleport<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: &EntityId,
        destination: Position,
        driver: Option<SessionKey>,
    ) {
        let Some(mover) = self.movers.get_mut(entity) else {
            return;
        };
        mover.set_teleport_state(TeleportState::Idle);
        mover.relocate(&destination);
        mover.set_out_of_bounds(false);
        mover.stop_moving();
        mover.set_fall_information(0, destination.z);
        if let Some(transport) = mover.transport() {
            let offset = world.passenger_offset(transport, &destination);
            let mut info = *mover.movement_info();
            if let Some(transport_info) = info.transport.as_mut() {
                transport_info.offset = offset;
            }
            mover.update_movement_info(&info);
        }
        let canonical = *mover.movement_info();
        let is_player = mover.is_player();
        let map = mover.map();

        self.broadcast(
            world,
            entity,
            driver,
            ServerMessage::Teleported { info: canonical },
        );

        self.refresh_zone(world, entity);

        if is_player {
            if let Some((pet, pet_position)) = world.pet_of(*entity) {
                let range = world.visibility_range(map) - self.config.pet_teleport_margin;
                if pet_position.distance_3d(&destination) > range {
                    world.relocate_pet(pet, &destination);
                }
            }
            world.resummon_pet(*entity);
            world.process_delayed_operations(*entity);
        }

        world.reinitialize_motion(*entity);
    }

    /// Recomputes zone and area, re-evaluating zone rules when the zone changed
    fn refresh_zone<W: MovementWorld>(&mut self, world: &mut W, entity: &EntityId) {
        let Some(mover) = self.movers.get_mut(entity) else {
            return;
        };
        let (old_zone, _) = mover.zone();
        let (zone, area) = world.zone_and_area(mover.map(), mover.position());
        mover.set_zone(zone, area);
        world.update_zone(*entity, zone, area);
        if zone != old_zone {
            world.on_zone_changed(*entity, old_zone, zone);
        }
    }

    /// The client finished loading the far teleport destination
    pub(crate) fn handle_worldport_ack<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
    ) -> Result<(), Rejection> {
        let player = self
            .control
            .session(session)
            .map(|record| record.player())
            .ok_or(DropReason::UnknownSession)?;
        let Some(mover) = self.movers.get_mut(&player) else {
            return Err(DropReason::UnknownEntity(player).into());
        };
        let TeleportState::FarPending { location } = *mover.teleport_state() else {
            debug!("{} sent a worldport acknowledgment with no teleport pending", session);
            return Err(DropReason::NoFarTeleportPending(player).into());
        };
        mover.set_teleport_state(TeleportState::Idle);

        if !world.is_valid_map_coord(location.map, &location.position) {
            error!(
                "{} was teleported to invalid coordinates {:?} on map {:?}",
                player, location.position, location.map
            );
            return Err(ProtocolViolation::InvalidTeleportDestination {
                entity: player,
                map: location.map,
            }
            .into());
        }

        let reset_warning = world.instance_reset_warning(player, location.map);

        let arrived = match world.enter_map(player, &location) {
            Ok(()) => location,
            Err(entry_error) => {
                warn!("{} could not enter map {:?}: {}", player, location.map, entry_error);
                let home = world.homebind(player);
                if let Err(home_error) = world.enter_map(player, &home) {
                    error!("{} could not be sent home either: {}", player, home_error);
                }
                home
            }
        };

        if let Some(transport) = mover.transport() {
            world.leave_transport(player, transport);
            mover.set_transport(None);
        }
        let mut info = *mover.movement_info();
        info.reset_transport();
        info.position = arrived.position;
        mover.update_movement_info(&info);
        mover.set_map(arrived.map);
        mover.stop_moving();
        mover.set_fall_information(0, arrived.position.z);
        mover.set_out_of_bounds(false);

        world.on_map_entered(player, arrived.map);

        if arrived == location {
            if let Some(time_left) = reset_warning {
                self.outbox.push(
                    *session,
                    ServerMessage::InstanceResetWarning {
                        map: arrived.map,
                        time_left,
                    },
                );
            }
        }

        self.refresh_zone(world, &player);
        world.resummon_pet(player);
        world.process_delayed_operations(player);

        self.events.push_far_teleport(&player, arrived);
        info!("{} arrived on map {:?}", player, arrived.map);
        Ok(())
    }

    /// Privileged console teleport of the session's own player
    pub(crate) fn handle_world_teleport<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        location: WorldLocation,
    ) -> Result<(), Rejection> {
        let player = self
            .control
            .session(session)
            .map(|record| record.player())
            .ok_or(DropReason::UnknownSession)?;

        if world.is_in_flight(player) {
            debug!("{} requested a world teleport while in flight", session);
            return Err(DropReason::InFlight(player).into());
        }
        if !world.can_world_teleport(*session) {
            info!("{} requested a world teleport without permission", session);
            return Err(DropReason::NotPrivileged.into());
        }

        self.teleport_to(world, player, location)
            .map_err(|error| DropReason::TeleportRefused(player, error.to_string()))?;
        Ok(())
    }

    pub(crate) fn handle_summon_response<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        summoner: EntityId,
        agree: bool,
    ) -> Result<(), Rejection> {
        let player = self
            .control
            .session(session)
            .map(|record| record.player())
            .ok_or(DropReason::UnknownSession)?;

        if !world.is_alive(player) || world.is_in_combat(player) {
            return Err(DropReason::CannotBeSummoned(player).into());
        }

        world.summon_if_possible(player, summoner, agree);
        Ok(())
    }
}
