use log::{trace, warn};

use helm_shared::{EntityId, MovementFlags, MovementInfo, ServerMessage, SessionKey};

use crate::{
    AckPayload, AntiCheat, ChangeKind, DropReason, LedgerError, MovementServer, MovementWorld,
    PendingChange, Rejection,
};

impl<A: AntiCheat> MovementServer<A> {
    /// Matches an acknowledgment against the oldest pending change of the
    /// entity and applies it. Any mismatch is a protocol violation.
    pub(crate) fn handle_acknowledgment<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        entity: EntityId,
        counter: u32,
        payload: AckPayload,
        info: Option<MovementInfo>,
    ) -> Result<(), Rejection> {
        self.authorize_acknowledgment(session, &entity)?;

        let Some(mover) = self.movers.get_mut(&entity) else {
            return Err(DropReason::UnknownEntity(entity).into());
        };
        mover
            .ledger
            .verify_front(counter, &payload, self.config.ack_tolerance)?;
        let change = mover
            .ledger
            .pop_front()
            .ok_or(LedgerError::UnsolicitedAcknowledgment {
                entity,
                received: counter,
            })?;

        trace!(
            "{} acknowledged counter {} on {}",
            session,
            change.counter,
            entity
        );

        self.resolve_change(world, session, &entity, change, info);
        Ok(())
    }

    /// Applies an acknowledged change and tells observers about it
    fn resolve_change<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        entity: &EntityId,
        change: PendingChange,
        info: Option<MovementInfo>,
    ) {
        match change.kind {
            ChangeKind::Speed { move_type, speed } => {
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.set_speed_rate(move_type, speed / move_type.base_speed());
                }
                if let Some(info) = info {
                    self.merge_acknowledged_info(entity, info);
                }
                self.broadcast(
                    world,
                    entity,
                    Some(*session),
                    ServerMessage::SpeedChanged {
                        entity: *entity,
                        move_type,
                        speed,
                    },
                );
            }
            ChangeKind::FlagToggle { toggle, apply } => {
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.set_capability(toggle, apply);
                }
                if let Some(info) = info {
                    self.merge_acknowledged_info(entity, info);
                }
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.set_movement_flag(toggle.movement_flag(), apply);
                }
                self.broadcast(
                    world,
                    entity,
                    Some(*session),
                    ServerMessage::MovementFlagChanged {
                        entity: *entity,
                        toggle,
                        apply,
                    },
                );
            }
            ChangeKind::KnockBack { jump } => {
                let Some(mut info) = info else {
                    warn!("knockback acknowledgment for {} carried no snapshot", entity);
                    return;
                };
                if let Some(mover) = self.movers.get_mut(entity) {
                    mover.strip_flight();
                }
                info.flags.remove(MovementFlags::CAN_FLY);
                self.merge_acknowledged_info(entity, info);
                self.broadcast(
                    world,
                    entity,
                    Some(*session),
                    ServerMessage::KnockedBack {
                        entity: *entity,
                        jump,
                    },
                );
                self.anti_cheat.on_knockback(*session, *entity);
            }
            ChangeKind::Teleport { destination } => {
                self.complete_near_teleport(world, entity, destination, Some(*session));
            }
        }

        self.events.push_resolve(entity, change);
    }
}
