use std::collections::VecDeque;

use helm_shared::EntityId;

use super::{
    error::LedgerError,
    pending_change::{AckPayload, ChangeKind, PendingChange},
};

/// Returns whether a wrapping counter comes after another
/// counter_greater_than(2,1) will return true
/// counter_greater_than(1,2) will return false
/// counter_greater_than(0,u32::MAX) will return true
pub fn counter_greater_than(c1: u32, c2: u32) -> bool {
    const HALF: u32 = u32::MAX / 2 + 1;
    ((c1 > c2) && (c1 - c2 <= HALF)) || ((c1 < c2) && (c2 - c1 > HALF))
}

/// Ordered queue of the changes one entity is waiting on. Only the oldest
/// entry may be acknowledged; counters keep increasing for the lifetime of
/// the entity, even across handoffs.
pub struct ChangeLedger {
    entity: EntityId,
    list: VecDeque<PendingChange>,
    next_counter: u32,
    last_counter: Option<u32>,
}

impl ChangeLedger {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            list: VecDeque::new(),
            next_counter: 1,
            last_counter: None,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn front(&self) -> Option<&PendingChange> {
        self.list.front()
    }

    pub fn pop_front(&mut self) -> Option<PendingChange> {
        self.list.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingChange> {
        self.list.iter()
    }

    pub fn contains(&self, counter: u32) -> bool {
        self.list.iter().any(|change| change.counter == counter)
    }

    /// Counter the next appended change will receive
    pub fn next_counter(&self) -> u32 {
        self.next_counter
    }

    /// Assigns the next counter to `kind` and appends it
    pub fn push(&mut self, kind: ChangeKind) -> PendingChange {
        let change = PendingChange::new(self.next_counter, kind);
        self.list.push_back(change);
        self.last_counter = Some(change.counter);
        self.next_counter = self.next_counter.wrapping_add(1);
        change
    }

    /// Appends a change that already carries a counter. The counter must come
    /// after every counter this ledger has issued.
    pub fn try_push(&mut self, change: PendingChange) -> Result<(), LedgerError> {
        if let Some(last) = self.last_counter {
            if !counter_greater_than(change.counter, last) {
                return Err(LedgerError::NonMonotonicCounter {
                    entity: self.entity,
                    counter: change.counter,
                    last,
                });
            }
        }
        self.list.push_back(change);
        self.last_counter = Some(change.counter);
        self.next_counter = change.counter.wrapping_add(1);
        Ok(())
    }

    /// Checks that an acknowledgment answers the oldest outstanding change.
    /// Counter, kind and payload are checked in that order; the ledger is
    /// left untouched either way.
    pub fn verify_front(
        &self,
        counter: u32,
        payload: &AckPayload,
        tolerance: f32,
    ) -> Result<&PendingChange, LedgerError> {
        let Some(front) = self.list.front() else {
            return Err(LedgerError::UnsolicitedAcknowledgment {
                entity: self.entity,
                received: counter,
            });
        };

        if front.counter != counter {
            return Err(LedgerError::CounterMismatch {
                entity: self.entity,
                expected: front.counter,
                received: counter,
            });
        }

        if front.family() != payload.family() {
            return Err(LedgerError::KindMismatch {
                entity: self.entity,
                counter,
                expected: front.family(),
                received: payload.family(),
            });
        }

        front.verify_payload(self.entity, payload, tolerance)?;

        Ok(front)
    }

    /// Discards every outstanding change, oldest first. The counter keeps
    /// going, so acknowledgments for drained changes can never match again.
    pub fn drain(&mut self) -> Vec<PendingChange> {
        self.list.drain(..).collect()
    }
}
