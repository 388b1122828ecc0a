//! Shared application state.

use std::sync::Arc;

use resto_db::Database;

use crate::auth::JwtManager;

/// State handed to every handler. Cheap to clone: the database wraps a
/// pool and the JWT manager is behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
        }
    }
}
