use std::mem;

use log::{info, trace, warn};

use helm_shared::{ClientMessage, EntityId, MovementInfo, ServerMessage, SessionKey, WorldLocation};

use crate::{
    mover::validator, AckPayload, AntiCheat, Authorization, ControlMap, ControlState,
    ControllerSession, DropReason, HelmServerError, MovableEntity, MovementEvents, MovementWorld,
    MoverKind, MoverStore, NoopAntiCheat, Outbox, ProtocolViolation, Rejection, ServerConfig,
    TeleportState,
};

/// The movement control and sync layer. Owns which session drives which
/// entity, the canonical movement state of every registered entity and the
/// ledger of changes each driving client still has to acknowledge.
///
/// All input arrives through [`MovementServer::receive`] one message at a
/// time; output accumulates in an [`Outbox`] and in [`MovementEvents`].
pub struct MovementServer<A: AntiCheat = NoopAntiCheat> {
    pub(crate) config: ServerConfig,
    pub(crate) control: ControlMap,
    pub(crate) movers: MoverStore,
    pub(crate) outbox: Outbox,
    pub(crate) events: MovementEvents,
    pub(crate) anti_cheat: A,
    next_spline_id: u32,
}

impl MovementServer<NoopAntiCheat> {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_anti_cheat(config, NoopAntiCheat)
    }
}

impl<A: AntiCheat> MovementServer<A> {
    pub fn with_anti_cheat(config: ServerConfig, anti_cheat: A) -> Self {
        Self {
            config,
            control: ControlMap::new(),
            movers: MoverStore::new(),
            outbox: Outbox::new(),
            events: MovementEvents::new(),
            anti_cheat,
            next_spline_id: 0,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn anti_cheat(&self) -> &A {
        &self.anti_cheat
    }

    pub fn anti_cheat_mut(&mut self) -> &mut A {
        &mut self.anti_cheat
    }

    // Entities

    /// Register a movable entity at `location`
    ///
    /// # Panics
    ///
    /// Panics if the entity is already registered or the location is invalid.
    /// Consider using `try_register_entity` for non-panicking error handling.
    pub fn register_entity<W: MovementWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        kind: MoverKind,
        location: WorldLocation,
    ) {
        self.try_register_entity(world, entity, kind, location)
            .expect("Entity could not be registered with the MovementServer!")
    }

    /// Register a movable entity at `location`
    ///
    /// Returns an error if the entity is already registered or the location
    /// is invalid.
    pub fn try_register_entity<W: MovementWorld>(
        &mut self,
        world: &W,
        entity: EntityId,
        kind: MoverKind,
        location: WorldLocation,
    ) -> Result<(), HelmServerError> {
        location.position.validate()?;
        let mut mover = MovableEntity::new(entity, kind, location);
        let (zone, area) = world.zone_and_area(location.map, &location.position);
        mover.set_zone(zone, area);
        self.movers.try_register_entity(mover)
    }

    /// Removes the entity. Its driver, if any, loses control and its pending
    /// changes are discarded.
    pub fn deregister_entity(&mut self, entity: &EntityId) -> Option<MovableEntity> {
        self.release_entity(entity);
        let mut mover = self.movers.deregister_entity(entity)?;
        let discarded = mover.ledger.drain();
        self.events.push_drain(entity, discarded);
        Some(mover)
    }

    pub fn entity(&self, entity: &EntityId) -> Option<&MovableEntity> {
        self.movers.get(entity)
    }

    pub fn movers(&self) -> &MoverStore {
        &self.movers
    }

    // Sessions

    /// Register a newly connected session
    ///
    /// # Panics
    ///
    /// Panics if the session is already connected.
    /// Consider using `try_connect_session` for non-panicking error handling.
    pub fn connect_session(&mut self, session: SessionKey, player: EntityId) {
        self.try_connect_session(session, player)
            .expect("Session cannot connect more than once!")
    }

    /// Register a newly connected session
    ///
    /// Returns an error if the session is already connected.
    pub fn try_connect_session(
        &mut self,
        session: SessionKey,
        player: EntityId,
    ) -> Result<(), HelmServerError> {
        self.control.try_register_session(session, player)?;
        Ok(())
    }

    /// Tears down everything the session held. The entity it drove keeps its
    /// last validated state; its pending changes are discarded.
    pub fn disconnect_session(&mut self, session: &SessionKey) {
        let Some(record) = self.control.deregister_session(session) else {
            warn!("attempting to disconnect session that does not exist: {}", session);
            return;
        };
        info!("disconnecting {}", session);
        if let Some(entity) = record.active_mover() {
            self.drain_ledger(&entity);
            self.anti_cheat.on_handoff_changed(*session, Some(entity), None);
            self.events.push_handoff(session, Some(entity), None);
        }
    }

    pub fn session(&self, session: &SessionKey) -> Option<&ControllerSession> {
        self.control.session(session)
    }

    pub fn control(&self) -> &ControlMap {
        &self.control
    }

    pub fn driver_of(&self, entity: &EntityId) -> Option<SessionKey> {
        self.control.driver_of(entity)
    }

    pub fn active_mover(&self, session: &SessionKey) -> Option<EntityId> {
        self.control.active_mover(session)
    }

    pub fn control_state(&self, session: &SessionKey, entity: &EntityId) -> ControlState {
        self.control.state(session, entity)
    }

    // Output

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn take_outgoing(&mut self) -> Vec<(SessionKey, ServerMessage)> {
        self.outbox.take()
    }

    pub fn take_events(&mut self) -> MovementEvents {
        mem::take(&mut self.events)
    }

    // Input

    /// Handles one client message. Messages from one session must be passed
    /// in the order they arrived.
    ///
    /// A `Rejection::Violation` has already kicked the session by the time it
    /// is returned.
    pub fn receive<W: MovementWorld>(
        &mut self,
        world: &mut W,
        session: &SessionKey,
        message: ClientMessage,
    ) -> Result<(), Rejection> {
        let Some(record) = self.control.session(session) else {
            warn!("received {} from unknown {}", message.name(), session);
            return Err(DropReason::UnknownSession.into());
        };
        if record.is_kicked() {
            return Err(DropReason::SessionKicked.into());
        }

        trace!("{}: {}", message.name(), session);

        let result = match message {
            ClientMessage::Movement { opcode, info } => {
                self.handle_movement(world, session, opcode, info)
            }
            ClientMessage::SetActiveMover { entity } => {
                self.handle_set_active_mover(world, session, entity)
            }
            ClientMessage::MoveNotActiveMover { info } => {
                self.handle_move_not_active_mover(session, info)
            }
            ClientMessage::SplineDone { entity, spline_id } => {
                self.handle_spline_done(session, entity, spline_id)
            }
            ClientMessage::TeleportAck {
                entity, counter, ..
            } => self.handle_acknowledgment(
                world,
                session,
                entity,
                counter,
                AckPayload::Teleport,
                None,
            ),
            ClientMessage::SpeedChangeAck {
                entity,
                counter,
                move_type,
                info,
                speed,
            } => self.handle_acknowledgment(
                world,
                session,
                entity,
                counter,
                AckPayload::Speed { move_type, speed },
                Some(info),
            ),
            ClientMessage::FlagChangeAck {
                entity,
                counter,
                toggle,
                info,
                apply,
            } => self.handle_acknowledgment(
                world,
                session,
                entity,
                counter,
                AckPayload::Flag { toggle, apply },
                Some(info),
            ),
            ClientMessage::KnockBackAck {
                entity,
                counter,
                info,
            } => self.handle_acknowledgment(
                world,
                session,
                entity,
                counter,
                AckPayload::KnockBack { jump: info.jump },
                Some(info),
            ),
            ClientMessage::TimeSkipped {
                entity,
                time_skipped,
            } => self.handle_time_skipped(world, session, entity, time_skipped),
            ClientMessage::WorldTeleport { location, .. } => {
                self.handle_world_teleport(world, session, location)
            }
            ClientMessage::SummonResponse { summoner, agree } => {
                self.handle_summon_response(world, session, summoner, agree)
            }
            ClientMessage::WorldportAck => self.handle_worldport_ack(world, session),
        };

        if let Err(Rejection::Violation(violation)) = &result {
            self.kick(session, violation.clone());
        }

        result
    }

    // Crate-public

    /// Records a violation and, unless configured otherwise, strips the
    /// session of control and ignores everything it sends from now on
    pub(crate) fn kick(&mut self, session: &SessionKey, violation: ProtocolViolation) {
        warn!("{} violated the movement protocol: {}", session, violation);
        self.anti_cheat.on_violation(*session, &violation);
        self.events.push_kick(session, violation.clone());

        if !self.config.kick_on_violation {
            return;
        }

        if let Some(entity) = self.control.release_session(session) {
            self.drain_ledger(&entity);
            self.anti_cheat.on_handoff_changed(*session, Some(entity), None);
            self.events.push_handoff(session, Some(entity), None);
        }
        if let Some(record) = self.control.session_mut(session) {
            record.pending_mover = None;
            record.kicked = Some(violation);
        }
    }

    /// Movement reports must come from the entity's driver once its handoff
    /// has settled
    pub(crate) fn authorize_report(
        &mut self,
        session: &SessionKey,
        entity: &EntityId,
    ) -> Result<(), Rejection> {
        match self.control.authorization(session, entity) {
            Authorization::Authorized => Ok(()),
            Authorization::Transitioning { spline_id } => {
                warn!(
                    "{} moved {} before completing handoff spline {}",
                    session, entity, spline_id
                );
                Err(DropReason::HandoffInProgress(*entity).into())
            }
            Authorization::NotDriving => self.unauthorized_move(session, entity),
        }
    }

    /// Acknowledgments for entities the session does not drive can never be
    /// legitimate
    pub(crate) fn authorize_acknowledgment(
        &mut self,
        session: &SessionKey,
        entity: &EntityId,
    ) -> Result<(), Rejection> {
        match self.control.authorization(session, entity) {
            Authorization::Authorized => Ok(()),
            Authorization::Transitioning { spline_id } => {
                warn!(
                    "{} acknowledged a change on {} before completing handoff spline {}",
                    session, entity, spline_id
                );
                Err(DropReason::HandoffInProgress(*entity).into())
            }
            Authorization::NotDriving => Err(ProtocolViolation::AckForUndrivenEntity {
                session: *session,
                entity: *entity,
            }
            .into()),
        }
    }

    pub(crate) fn unauthorized_move(
        &mut self,
        session: &SessionKey,
        entity: &EntityId,
    ) -> Result<(), Rejection> {
        self.anti_cheat.on_unauthorized_move(*session, *entity);

        let Some(record) = self.control.session_mut(session) else {
            return Err(DropReason::UnknownSession.into());
        };
        record.unauthorized_moves = record.unauthorized_moves.saturating_add(1);
        let count = record.unauthorized_moves;

        if count > self.config.unauthorized_move_limit {
            return Err(ProtocolViolation::RepeatedUnauthorizedMoves {
                session: *session,
                count,
            }
            .into());
        }

        warn!("{} tried to move {}, which it does not drive", session, entity);
        Err(DropReason::NotDriving(*entity).into())
    }

    /// Sends `message` to every observer of `entity` except `except`, in
    /// random order
    pub(crate) fn broadcast<W: MovementWorld>(
        &mut self,
        world: &W,
        entity: &EntityId,
        except: Option<SessionKey>,
        message: ServerMessage,
    ) {
        let mut observers: Vec<SessionKey> = world
            .observers(*entity)
            .into_iter()
            .filter(|session| Some(*session) != except)
            .collect();

        // shuffle order of observers in order to avoid priority among sessions
        fastrand::shuffle(&mut observers);

        self.outbox.push_all(&observers, &message);
    }

    pub(crate) fn next_spline_id(&mut self) -> u32 {
        self.next_spline_id = self.next_spline_id.wrapping_add(1);
        self.next_spline_id
    }

    /// Discards every change the entity is waiting on
    pub(crate) fn drain_ledger(&mut self, entity: &EntityId) {
        let Some(mover) = self.movers.get_mut(entity) else {
            return;
        };
        let discarded = mover.ledger.drain();
        if discarded.is_empty() {
            return;
        }
        trace!("discarding {} pending changes of {}", discarded.len(), entity);
        // a drained teleport will never be acknowledged
        if matches!(mover.teleport_state(), TeleportState::NearPending { .. }) {
            mover.set_teleport_state(TeleportState::Idle);
        }
        self.events.push_drain(entity, discarded);
    }

    /// Sanitizes an acknowledgment's snapshot and merges it when its position
    /// is legal
    pub(crate) fn merge_acknowledged_info(&mut self, entity: &EntityId, mut info: MovementInfo) {
        let Some(mover) = self.movers.get_mut(entity) else {
            return;
        };
        if info.entity != *entity {
            warn!("acknowledgment snapshot names {} instead of {}", info.entity, entity);
            return;
        }
        validator::sanitize(mover, &mut info);
        if let Err(error) = info.position.validate() {
            warn!("ignoring acknowledged snapshot of {}: {}", entity, error);
            return;
        }
        // keep the server's transport bookkeeping authoritative
        if mover.transport().is_none() {
            info.reset_transport();
        }
        mover.update_movement_info(&info);
    }
}
