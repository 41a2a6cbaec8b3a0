use log::{debug, info};

use helm_shared::{
    EntityId, MovementFlags, MovementInfo, MovementOpcode, ServerMessage, SessionKey,
    WorldLocation,
};

use crate::{
    mover::validator, AntiCheat, DamageKind, DropReason, FallReport, MovementServer,
    MovementWorld, Rejection,
};

impl<A: AntiCheat> MovementServer<A> {
    /// Every movement report category shares this path: authorize, validate
    /// and merge, relay, then apply the consequences of the new position
    pub(crate) fn handle_movement<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        opcode: MovementOpcode,
        mut info: MovementInfo,
    ) -> Result<(), Rejection> {
        let entity = info.entity;
        self.authorize_report(session, &entity)?;

        let Some(mover) = self.movers.get_mut(&entity) else {
            return Err(DropReason::UnknownEntity(entity).into());
        };
        validator::accept_report(world, &self.config, mover, &mut info)?;

        // retail relays fly toggles as swim-cheat start / stop
        let relay_opcode = match opcode {
            MovementOpcode::SetFly if info.is_jumping_or_falling() => {
                MovementOpcode::StartSwimCheat
            }
            MovementOpcode::SetFly => MovementOpcode::StopSwimCheat,
            other => other,
        };
        let merged = *mover.movement_info();
        self.broadcast(
            world,
            &entity,
            Some(*session),
            ServerMessage::MovementRelay {
                opcode: relay_opcode,
                info: merged,
            },
        );

        // passengers are tracked at their absolute position
        let Some(mover) = self.movers.get_mut(&entity) else {
            return Ok(());
        };
        if let (Some(transport), Some(transport_info)) = (mover.transport(), merged.transport) {
            let position = world.passenger_position(transport, &transport_info.offset);
            mover.relocate(&position);
        }

        if !world.is_standing(entity)
            && merged
                .flags
                .intersects(MovementFlags::MASK_MOVING | MovementFlags::MASK_TURNING)
        {
            world.stand_up(entity);
        }

        if mover.is_player() {
            let (last_fall_time, fall_start_z) = mover.fall_information();

            if opcode == MovementOpcode::FallLand
                && !world.is_in_flight(entity)
                && mover
                    .transport()
                    .map_or(true, |transport| world.is_static_transport(transport))
            {
                world.handle_fall(&FallReport {
                    entity,
                    start_z: fall_start_z,
                    land_z: merged.position.z,
                    fall_time: merged.fall_time,
                });
            }

            if last_fall_time >= merged.fall_time
                || fall_start_z <= merged.position.z
                || opcode == MovementOpcode::FallLand
            {
                mover.set_fall_information(merged.fall_time, merged.position.z);
            }

            if merged.has_flag(MovementFlags::MASK_MOVING) {
                world.mark_moved(entity);
            }

            let map = mover.map();
            let position = merged.position;
            let min_height = world.min_height(map, position.x, position.y);
            if position.z < min_height {
                self.handle_below_map(world, &entity, min_height);
            } else if world.can_free_move(entity) && !merged.is_jumping_or_falling() {
                mover.save_safe_position(position);
            }
        }

        self.anti_cheat.on_report(*session, opcode, &merged);

        Ok(())
    }

    /// Ground above the minimum height means the entity slipped through the
    /// map and is recalled; no ground means it fell into the void and dies
    fn handle_below_map<W: MovementWorld>(
        &mut self,
        world: &mut W,
        entity: &EntityId,
        min_height: f32,
    ) {
        let Some(mover) = self.movers.get_mut(entity) else {
            return;
        };
        let position = *mover.position();
        let ground = world.ground_height(mover.map(), position.x, position.y);

        if ground > min_height {
            self.undermap_recall(world, entity);
            return;
        }

        mover.set_out_of_bounds(true);
        let killed = world.is_alive(*entity);
        if killed {
            info!("{} fell out of the map at {:?}", entity, position);
            let health = world.health(*entity);
            world.environmental_damage(*entity, DamageKind::FallToVoid, health);
            world.kill(*entity);
        }
        self.events.push_out_of_bounds(entity, killed);
    }

    /// Sends the entity back to its last safe position, or home if it never
    /// had one
    fn undermap_recall<W: MovementWorld>(&mut self, world: &mut W, entity: &EntityId) {
        let Some(mover) = self.movers.get(entity) else {
            return;
        };
        let location = match mover.safe_position() {
            Some(position) => {
                let position = *position;
                self.events.push_recall(entity, position);
                WorldLocation::new(mover.map(), position)
            }
            None => world.homebind(*entity),
        };
        debug!("recalling {} to {:?}", entity, location);

        if let Err(error) = self.teleport_to(world, *entity, location) {
            info!("could not recall {}: {}", entity, error);
        }
    }

    pub(crate) fn handle_time_skipped<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        entity: EntityId,
        time_skipped: u32,
    ) -> Result<(), Rejection> {
        self.authorize_report(session, &entity)?;
        if !self.movers.contains(&entity) {
            return Err(DropReason::UnknownEntity(entity).into());
        }
        self.broadcast(
            world,
            &entity,
            Some(*session),
            ServerMessage::TimeSkippedRelay {
                entity,
                time_skipped,
            },
        );
        Ok(())
    }
}
