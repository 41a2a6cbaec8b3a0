use log::{debug, error, info, trace, warn};

use helm_shared::{EntityId, MovementInfo, ServerMessage, SessionKey};

use crate::{
    AntiCheat, ControlError, DropReason, HelmServerError, MovementServer, MovementWorld,
    Rejection,
};

impl<A: AntiCheat> MovementServer<A> {
    /// Offers control of `entity` to `session`. The session drives it once
    /// its client answers with `SetActiveMover`.
    pub fn grant_control<W: MovementWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        session: SessionKey,
    ) -> Result<(), HelmServerError> {
        if !self.movers.contains(&entity) {
            return Err(HelmServerError::EntityNotRegistered(entity));
        }
        let record = self
            .control
            .session(&session)
            .ok_or(ControlError::SessionNotRegistered {
                session,
                operation: "grant_control",
            })?;
        if record.is_kicked() {
            return Err(ControlError::SessionKicked { session }.into());
        }
        if record.active_mover() == Some(entity) {
            return Ok(());
        }
        if world.is_client_control_blocked(entity) {
            return Err(ControlError::ControlForbidden { entity }.into());
        }

        self.control.offer(&session, entity)?;
        self.outbox.push(
            session,
            ServerMessage::ClientControlUpdate {
                entity,
                allow_move: true,
            },
        );
        debug!("offered control of {} to {}", entity, session);
        Ok(())
    }

    /// Takes control of `entity` away from whoever drives it or was offered
    /// it. Returns the session that was driving.
    pub fn revoke_control(&mut self, entity: &EntityId) -> Option<SessionKey> {
        self.release_entity(entity)
    }

    pub(crate) fn release_entity(&mut self, entity: &EntityId) -> Option<SessionKey> {
        for session in self.control.withdraw_offers(entity) {
            self.outbox.push(
                session,
                ServerMessage::ClientControlUpdate {
                    entity: *entity,
                    allow_move: false,
                },
            );
        }

        let driver = self.control.release_entity(entity)?;
        self.outbox.push(
            driver,
            ServerMessage::ClientControlUpdate {
                entity: *entity,
                allow_move: false,
            },
        );
        self.drain_ledger(entity);
        self.anti_cheat.on_handoff_changed(driver, Some(*entity), None);
        self.events.push_handoff(&driver, Some(*entity), None);
        debug!("revoked control of {} from {}", entity, driver);
        Some(driver)
    }

    /// The client took the entity it was offered. The old relations are
    /// dissolved, both ledgers drained and the entity is held in place by a
    /// stop spline whose completion settles the handoff.
    pub(crate) fn handle_set_active_mover<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        entity: EntityId,
    ) -> Result<(), Rejection> {
        if self.control.active_mover(session) == Some(entity) {
            trace!("{} is already moving {}", session, entity);
            return Ok(());
        }
        if self.control.pending_mover(session) != Some(entity) {
            error!(
                "{} tried to take control of {}, which it was never offered",
                session, entity
            );
            return Err(DropReason::NotPendingMover(entity).into());
        }
        if !self.movers.contains(&entity) {
            error!("{} tried to take control of unknown {}", session, entity);
            return Err(DropReason::UnknownEntity(entity).into());
        }

        let spline_id = self.next_spline_id();
        let activation = self
            .control
            .activate(session, entity, spline_id)
            .map_err(|_| DropReason::NotPendingMover(entity))?;

        if let Some(previous) = activation.previous {
            self.drain_ledger(&previous);
        }
        // whatever is still pending was addressed to the previous driver
        self.drain_ledger(&entity);

        if let Some(displaced) = activation.displaced {
            self.outbox.push(
                displaced,
                ServerMessage::ClientControlUpdate {
                    entity,
                    allow_move: false,
                },
            );
            self.anti_cheat
                .on_handoff_changed(displaced, Some(entity), None);
            self.events.push_handoff(&displaced, Some(entity), None);
        }

        let Some(mover) = self.movers.get_mut(&entity) else {
            return Err(DropReason::UnknownEntity(entity).into());
        };
        mover.stop_moving();
        let stop = ServerMessage::MoveSplineStop {
            entity,
            spline_id,
            position: *mover.position(),
        };
        self.outbox.push(*session, stop.clone());
        self.broadcast(world, &entity, Some(*session), stop);

        self.anti_cheat
            .on_handoff_changed(*session, activation.previous, Some(entity));
        self.events
            .push_handoff(session, activation.previous, Some(entity));
        info!("{} now moves {} (spline {})", session, entity, spline_id);

        Ok(())
    }

    /// Completion of the handoff spline clears the transitional marker and
    /// releases any instructions held back meanwhile
    pub(crate) fn handle_spline_done(
        &mut self,
        session: &SessionKey,
        entity: EntityId,
        spline_id: u32,
    ) -> Result<(), Rejection> {
        match self.control.complete_transition(session, &entity, spline_id) {
            Ok(()) => {}
            // ordinary server splines complete all the time
            Err(ControlError::TransitionMismatch { expected: None, .. }) => return Ok(()),
            Err(ControlError::TransitionMismatch {
                expected: Some(expected),
                received,
                ..
            }) => {
                warn!(
                    "{} completed spline {} on {}, handoff waits for {}",
                    session, received, entity, expected
                );
                return Err(DropReason::StaleSpline {
                    expected: Some(expected),
                    received,
                }
                .into());
            }
            Err(_) => return Err(DropReason::UnknownSession.into()),
        }

        let Some(mover) = self.movers.get(&entity) else {
            return Ok(());
        };
        let info = *mover.movement_info();
        let held: Vec<ServerMessage> = mover
            .ledger()
            .iter()
            .map(|change| change.instruction(entity, &info))
            .collect();
        for message in held {
            self.outbox.push(*session, message);
        }
        debug!("handoff of {} to {} settled", entity, session);
        Ok(())
    }

    /// The client gave up the entity it drives
    pub(crate) fn handle_move_not_active_mover(
        &mut self,
        session: &SessionKey,
        info: MovementInfo,
    ) -> Result<(), Rejection> {
        let entity = info.entity;
        let Some(active) = self.control.active_mover(session) else {
            error!("{} released {} but is not moving any entity", session, entity);
            return Err(DropReason::NoActiveMover.into());
        };
        if active != entity {
            error!(
                "{} released {} but is moving {}",
                session, entity, active
            );
            return self.unauthorized_move(session, &entity);
        }

        self.merge_acknowledged_info(&entity, info);
        self.drain_ledger(&entity);
        self.control.release_session(session);
        self.anti_cheat.on_handoff_changed(*session, Some(entity), None);
        self.events.push_handoff(session, Some(entity), None);
        debug!("{} stopped moving {}", session, entity);

        Ok(())
    }
}
