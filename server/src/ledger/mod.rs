pub mod change_ledger;
pub mod error;
pub mod pending_change;
