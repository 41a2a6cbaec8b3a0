pub mod movement_events;
pub mod outbox;
