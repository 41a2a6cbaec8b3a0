use std::collections::HashMap;

use helm_shared::EntityId;

use crate::{HelmServerError, MovableEntity};

/// Every entity the movement layer knows about
pub struct MoverStore {
    movers: HashMap<EntityId, MovableEntity>,
}

impl MoverStore {
    pub fn new() -> Self {
        Self {
            movers: HashMap::new(),
        }
    }

    /// Register an entity
    ///
    /// # Panics
    ///
    /// Panics if the entity is already registered.
    /// Consider using `try_register_entity` for non-panicking error handling.
    pub fn register_entity(&mut self, mover: MovableEntity) {
        self.try_register_entity(mover)
            .expect("Entity cannot register more than once!")
    }

    /// Register an entity
    ///
    /// Returns an error if the entity is already registered.
    pub fn try_register_entity(&mut self, mover: MovableEntity) -> Result<(), HelmServerError> {
        let id = mover.id();
        if self.movers.contains_key(&id) {
            return Err(HelmServerError::EntityAlreadyRegistered(id));
        }
        self.movers.insert(id, mover);
        Ok(())
    }

    pub fn deregister_entity(&mut self, entity: &EntityId) -> Option<MovableEntity> {
        self.movers.remove(entity)
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.movers.contains_key(entity)
    }

    pub fn get(&self, entity: &EntityId) -> Option<&MovableEntity> {
        self.movers.get(entity)
    }

    pub(crate) fn get_mut(&mut self, entity: &EntityId) -> Option<&mut MovableEntity> {
        self.movers.get_mut(entity)
    }

    /// Like `get`, for callers that require the entity
    pub fn try_get(&self, entity: &EntityId) -> Result<&MovableEntity, HelmServerError> {
        self.movers
            .get(entity)
            .ok_or(HelmServerError::EntityNotRegistered(*entity))
    }

    pub(crate) fn try_get_mut(
        &mut self,
        entity: &EntityId,
    ) -> Result<&mut MovableEntity, HelmServerError> {
        self.movers
            .get_mut(entity)
            .ok_or(HelmServerError::EntityNotRegistered(*entity))
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }
}
