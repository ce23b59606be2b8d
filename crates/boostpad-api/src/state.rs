//! Application state shared across handlers

use std::sync::Arc;

use boostpad_db::Database;
use boostpad_engine::TaskEngine;

use crate::identity::SharedIdentityProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connections and read-side repositories
    pub db: Arc<Database>,
    /// Transactional core
    pub engine: Arc<TaskEngine>,
    /// Bearer-token resolution
    pub identity: SharedIdentityProvider,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        engine: Arc<TaskEngine>,
        identity: SharedIdentityProvider,
    ) -> Self {
        Self { db, engine, identity }
    }
}
