pub mod control_map;
pub mod control_state;
pub mod error;
pub mod session;
