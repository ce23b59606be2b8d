//! Request and response DTOs

pub mod ledger;
pub mod profile;
pub mod task;

pub use ledger::*;
pub use profile::*;
pub use task::*;
