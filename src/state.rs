use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{self, StoreConnector};
use crate::users::password::PasswordStorage;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreConnector>,
    pub passwords: PasswordStorage,
}

impl AppState {
    /// Wire the connector for the configured backend. Does not connect; call
    /// [`StoreConnector::init`] for that.
    pub fn from_config(config: &AppConfig) -> Self {
        let backend = store::backend_from_url(
            &config.store.url,
            config.store.db_name.as_deref(),
            config.store.max_connections,
            config.store.connect_timeout_secs,
        );
        Self {
            store: Arc::new(StoreConnector::new(backend, config.store.connect_mode)),
            passwords: config.passwords,
        }
    }

    pub fn from_parts(store: Arc<StoreConnector>, passwords: PasswordStorage) -> Self {
        Self { store, passwords }
    }
}
