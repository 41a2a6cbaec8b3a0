use std::collections::HashMap;

use helm_shared::{EntityId, SessionKey};

use super::{control_state::ControlState, error::ControlError, session::ControllerSession};

/// Result of checking whether a session may move an entity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    /// Driving, but the handoff spline is still outstanding
    Transitioning { spline_id: u32 },
    NotDriving,
}

/// Outcome of a session taking control of an entity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Activation {
    /// What the session drove before
    pub previous: Option<EntityId>,
    /// Another session that drove the entity until now
    pub displaced: Option<SessionKey>,
}

/// The session <-> entity control relation. Every mutation updates both
/// directions, so `driver_of(e) == Some(s)` exactly when
/// `active_mover(s) == Some(e)`.
pub struct ControlMap {
    sessions: HashMap<SessionKey, ControllerSession>,
    drivers: HashMap<EntityId, SessionKey>,
}

impl ControlMap {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            drivers: HashMap::new(),
        }
    }

    /// Register a session whose player is `player`
    ///
    /// # Panics
    ///
    /// Panics if the session is already registered.
    /// Consider using `try_register_session` for non-panicking error handling.
    pub fn register_session(&mut self, session: SessionKey, player: EntityId) {
        self.try_register_session(session, player)
            .expect("Session cannot register more than once!")
    }

    /// Register a session whose player is `player`
    ///
    /// Returns an error if the session is already registered.
    pub fn try_register_session(
        &mut self,
        session: SessionKey,
        player: EntityId,
    ) -> Result<(), ControlError> {
        if self.sessions.contains_key(&session) {
            return Err(ControlError::SessionAlreadyRegistered { session });
        }
        self.sessions
            .insert(session, ControllerSession::new(session, player));
        Ok(())
    }

    /// Removes the session and its side of the relation
    pub fn deregister_session(&mut self, session: &SessionKey) -> Option<ControllerSession> {
        let removed = self.sessions.remove(session)?;
        if let Some(entity) = removed.active_mover {
            self.drivers.remove(&entity);
        }
        Some(removed)
    }

    pub fn contains_session(&self, session: &SessionKey) -> bool {
        self.sessions.contains_key(session)
    }

    pub fn session(&self, session: &SessionKey) -> Option<&ControllerSession> {
        self.sessions.get(session)
    }

    pub(crate) fn session_mut(&mut self, session: &SessionKey) -> Option<&mut ControllerSession> {
        self.sessions.get_mut(session)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &ControllerSession> {
        self.sessions.values()
    }

    pub fn driver_of(&self, entity: &EntityId) -> Option<SessionKey> {
        self.drivers.get(entity).copied()
    }

    pub fn active_mover(&self, session: &SessionKey) -> Option<EntityId> {
        self.sessions.get(session)?.active_mover
    }

    pub fn pending_mover(&self, session: &SessionKey) -> Option<EntityId> {
        self.sessions.get(session)?.pending_mover
    }

    pub fn state(&self, session: &SessionKey, entity: &EntityId) -> ControlState {
        let Some(record) = self.sessions.get(session) else {
            return ControlState::Unassigned;
        };
        if record.active_mover == Some(*entity) {
            return match record.pending_spline {
                Some(spline_id) => ControlState::Transitioning { spline_id },
                None => ControlState::Active,
            };
        }
        if record.pending_mover == Some(*entity) {
            return ControlState::PendingHandoff;
        }
        ControlState::Unassigned
    }

    pub fn authorization(&self, session: &SessionKey, entity: &EntityId) -> Authorization {
        match self.state(session, entity) {
            ControlState::Active => Authorization::Authorized,
            ControlState::Transitioning { spline_id } => {
                Authorization::Transitioning { spline_id }
            }
            ControlState::Unassigned | ControlState::PendingHandoff => Authorization::NotDriving,
        }
    }

    /// Marks `entity` as offered to `session`. Replaces an earlier offer.
    pub fn offer(&mut self, session: &SessionKey, entity: EntityId) -> Result<(), ControlError> {
        let record =
            self.sessions
                .get_mut(session)
                .ok_or(ControlError::SessionNotRegistered {
                    session: *session,
                    operation: "offer",
                })?;
        record.pending_mover = Some(entity);
        Ok(())
    }

    /// Clears every outstanding offer of `entity`, returning the sessions
    /// that had one
    pub fn withdraw_offers(&mut self, entity: &EntityId) -> Vec<SessionKey> {
        let mut withdrawn = Vec::new();
        for record in self.sessions.values_mut() {
            if record.pending_mover == Some(*entity) {
                record.pending_mover = None;
                withdrawn.push(record.key());
            }
        }
        withdrawn.sort();
        withdrawn
    }

    /// Makes `session` the driver of the entity it was offered. Both old
    /// relations (the session's previous entity, the entity's previous
    /// driver) are dissolved in the same step.
    pub fn activate(
        &mut self,
        session: &SessionKey,
        entity: EntityId,
        spline_id: u32,
    ) -> Result<Activation, ControlError> {
        let record = self
            .sessions
            .get(session)
            .ok_or(ControlError::SessionNotRegistered {
                session: *session,
                operation: "activate",
            })?;
        if !self.state(session, &entity).can_take_control() {
            return Err(ControlError::NotPendingMover {
                session: *session,
                entity,
            });
        }
        let previous = record.active_mover;

        if let Some(previous) = previous {
            self.drivers.remove(&previous);
        }

        let displaced = self.drivers.insert(entity, *session);
        if let Some(displaced) = displaced {
            if let Some(other) = self.sessions.get_mut(&displaced) {
                other.active_mover = None;
                other.pending_spline = None;
                other.unauthorized_moves = 0;
            }
        }

        if let Some(record) = self.sessions.get_mut(session) {
            record.active_mover = Some(entity);
            record.pending_mover = None;
            record.pending_spline = Some(spline_id);
            record.unauthorized_moves = 0;
        }

        Ok(Activation {
            previous,
            displaced,
        })
    }

    /// Clears the transitional marker once the matching spline completes
    pub fn complete_transition(
        &mut self,
        session: &SessionKey,
        entity: &EntityId,
        spline_id: u32,
    ) -> Result<(), ControlError> {
        let record =
            self.sessions
                .get_mut(session)
                .ok_or(ControlError::SessionNotRegistered {
                    session: *session,
                    operation: "complete_transition",
                })?;
        if record.active_mover != Some(*entity) || record.pending_spline != Some(spline_id) {
            return Err(ControlError::TransitionMismatch {
                session: *session,
                entity: *entity,
                expected: record.pending_spline,
                received: spline_id,
            });
        }
        record.pending_spline = None;
        Ok(())
    }

    /// Dissolves the session's relation, returning the entity it drove.
    /// Reports already in flight for it start a fresh unauthorized count.
    pub fn release_session(&mut self, session: &SessionKey) -> Option<EntityId> {
        let record = self.sessions.get_mut(session)?;
        let entity = record.active_mover.take()?;
        record.pending_spline = None;
        record.unauthorized_moves = 0;
        self.drivers.remove(&entity);
        Some(entity)
    }

    /// Dissolves the entity's relation, returning the session that drove it
    pub fn release_entity(&mut self, entity: &EntityId) -> Option<SessionKey> {
        let session = self.drivers.remove(entity)?;
        if let Some(record) = self.sessions.get_mut(&session) {
            record.active_mover = None;
            record.pending_spline = None;
            record.unauthorized_moves = 0;
        }
        Some(session)
    }

    /// True when both directions of the relation agree
    pub fn is_consistent(&self) -> bool {
        let forward = self.drivers.iter().all(|(entity, session)| {
            self.sessions
                .get(session)
                .map_or(false, |record| record.active_mover == Some(*entity))
        });
        let backward = self.sessions.values().all(|record| match record.active_mover {
            Some(entity) => self.drivers.get(&entity) == Some(&record.key()),
            None => true,
        });
        forward && backward
    }
}
