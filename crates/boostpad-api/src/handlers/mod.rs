//! Request handlers, one module per domain

pub mod health;
pub mod ledger;
pub mod profile;
pub mod tasks;
