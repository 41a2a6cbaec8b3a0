pub mod movable_entity;
pub mod mover_store;
pub mod validator;
