use sea_orm::DatabaseConnection;

use crate::infra::db::{DbTokenStore, DbWhitelistGate};
use crate::infra::telegram::TelegramClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub telegram: TelegramClient,
}

impl AppState {
    pub fn token_store(&self) -> DbTokenStore {
        DbTokenStore {
            db: self.db.clone(),
        }
    }

    pub fn whitelist_gate(&self) -> DbWhitelistGate {
        DbWhitelistGate {
            db: self.db.clone(),
        }
    }
}
