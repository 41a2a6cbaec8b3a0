use std::vec::IntoIter;

use helm_shared::{EntityId, Position, SessionKey, WorldLocation};

use crate::{PendingChange, ProtocolViolation};

/// Things that happened inside the movement layer which the surrounding
/// system may want to react to (disconnect a kicked session, audit a handoff)
pub struct MovementEvents {
    kicks: Vec<(SessionKey, ProtocolViolation)>,
    handoffs: Vec<(SessionKey, Option<EntityId>, Option<EntityId>)>,
    resolves: Vec<(EntityId, PendingChange)>,
    drains: Vec<(EntityId, Vec<PendingChange>)>,
    out_of_bounds: Vec<(EntityId, bool)>,
    recalls: Vec<(EntityId, Position)>,
    far_teleports: Vec<(EntityId, WorldLocation)>,
    empty: bool,
}

impl MovementEvents {
    pub(crate) fn new() -> Self {
        Self {
            kicks: Vec::new(),
            handoffs: Vec::new(),
            resolves: Vec::new(),
            drains: Vec::new(),
            out_of_bounds: Vec::new(),
            recalls: Vec::new(),
            far_teleports: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: MovementEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: MovementEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_kick(&mut self, session: &SessionKey, violation: ProtocolViolation) {
        self.kicks.push((*session, violation));
        self.empty = false;
    }

    pub(crate) fn push_handoff(
        &mut self,
        session: &SessionKey,
        previous: Option<EntityId>,
        current: Option<EntityId>,
    ) {
        self.handoffs.push((*session, previous, current));
        self.empty = false;
    }

    pub(crate) fn push_resolve(&mut self, entity: &EntityId, change: PendingChange) {
        self.resolves.push((*entity, change));
        self.empty = false;
    }

    pub(crate) fn push_drain(&mut self, entity: &EntityId, discarded: Vec<PendingChange>) {
        if discarded.is_empty() {
            return;
        }
        self.drains.push((*entity, discarded));
        self.empty = false;
    }

    pub(crate) fn push_out_of_bounds(&mut self, entity: &EntityId, killed: bool) {
        self.out_of_bounds.push((*entity, killed));
        self.empty = false;
    }

    pub(crate) fn push_recall(&mut self, entity: &EntityId, position: Position) {
        self.recalls.push((*entity, position));
        self.empty = false;
    }

    pub(crate) fn push_far_teleport(&mut self, entity: &EntityId, location: WorldLocation) {
        self.far_teleports.push((*entity, location));
        self.empty = false;
    }
}

impl Default for MovementEvents {
    fn default() -> Self {
        Self::new()
    }
}

// Event Trait
pub trait MovementEvent {
    type Iter;

    fn iter(events: &mut MovementEvents) -> Self::Iter;

    fn has(events: &MovementEvents) -> bool;
}

macro_rules! movement_event {
    ($event:ident, $field:ident, $item:ty) => {
        impl MovementEvent for $event {
            type Iter = IntoIter<$item>;

            fn iter(events: &mut MovementEvents) -> Self::Iter {
                let list = std::mem::take(&mut events.$field);
                IntoIterator::into_iter(list)
            }

            fn has(events: &MovementEvents) -> bool {
                !events.$field.is_empty()
            }
        }
    };
}

/// A session committed a protocol violation and should be disconnected
pub struct KickEvent;
movement_event!(KickEvent, kicks, (SessionKey, ProtocolViolation));

/// A session's driven entity changed: (session, previous, current)
pub struct HandoffEvent;
movement_event!(
    HandoffEvent,
    handoffs,
    (SessionKey, Option<EntityId>, Option<EntityId>)
);

/// A pending change was acknowledged and applied
pub struct ResolveEvent;
movement_event!(ResolveEvent, resolves, (EntityId, PendingChange));

/// Pending changes discarded on handoff or disconnect
pub struct DrainEvent;
movement_event!(DrainEvent, drains, (EntityId, Vec<PendingChange>));

/// An entity fell below its map; `true` when it was killed
pub struct OutOfBoundsEvent;
movement_event!(OutOfBoundsEvent, out_of_bounds, (EntityId, bool));

/// An entity fell below its map and is being returned to its last safe position
pub struct RecallEvent;
movement_event!(RecallEvent, recalls, (EntityId, Position));

/// A far teleport completed at the given location
pub struct FarTeleportEvent;
movement_event!(FarTeleportEvent, far_teleports, (EntityId, WorldLocation));
