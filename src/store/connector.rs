use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{StoreBackend, StoreError, UserStore};

/// How the connector reacts to a missing or dropped session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Connect lazily on the first request and again whenever the cached
    /// session reports itself disconnected. Failures fail the request.
    ReconnectOnDemand,
    /// Connect once at startup; a failure there is fatal to the process and a
    /// dropped session is never re-established.
    ConnectOnceFatal,
}

impl FromStr for ConnectMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reconnect" | "reconnect-on-demand" => Ok(Self::ReconnectOnDemand),
            "fatal" | "connect-once-fatal" => Ok(Self::ConnectOnceFatal),
            other => anyhow::bail!("unknown store connect mode {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Owns the single process-wide store session.
pub struct StoreConnector {
    backend: Arc<dyn StoreBackend>,
    mode: ConnectMode,
    // held across connection establishment so concurrent callers connect once
    handle: Mutex<Option<Arc<dyn UserStore>>>,
    state: StdMutex<ConnectionState>,
}

impl StoreConnector {
    pub fn new(backend: Arc<dyn StoreBackend>, mode: ConnectMode) -> Self {
        Self {
            backend,
            mode,
            handle: Mutex::new(None),
            state: StdMutex::new(ConnectionState::Disconnected),
        }
    }

    pub fn mode(&self) -> ConnectMode {
        self.mode
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: ConnectionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Startup hook. Eager modes connect here and surface the error to the
    /// caller; lazy modes defer to the first [`acquire`](Self::acquire).
    pub async fn init(&self) -> Result<(), StoreError> {
        match self.mode {
            ConnectMode::ReconnectOnDemand => {
                info!(store = %self.backend.describe(), "store connection deferred to first request");
                Ok(())
            }
            ConnectMode::ConnectOnceFatal => {
                let mut slot = self.handle.lock().await;
                if slot.is_none() {
                    *slot = Some(self.establish().await?);
                }
                Ok(())
            }
        }
    }

    /// Return a connected session, establishing one if the mode allows it.
    pub async fn acquire(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        let mut slot = self.handle.lock().await;

        if let Some(store) = slot.as_ref() {
            if store.is_connected() {
                return Ok(Arc::clone(store));
            }
            warn!(store = %self.backend.describe(), "cached store session is no longer connected");
            *slot = None;
            self.set_state(ConnectionState::Disconnected);
        }

        match self.mode {
            ConnectMode::ReconnectOnDemand => {
                let store = self.establish().await?;
                *slot = Some(Arc::clone(&store));
                Ok(store)
            }
            ConnectMode::ConnectOnceFatal => Err(StoreError::NotConnected),
        }
    }

    /// Close the cached session, if any.
    pub async fn shutdown(&self) {
        let mut slot = self.handle.lock().await;
        if let Some(store) = slot.take() {
            store.close().await;
            info!(store = %self.backend.describe(), "store connection closed");
        }
        self.set_state(ConnectionState::Disconnected);
    }

    async fn establish(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        self.set_state(ConnectionState::Connecting);
        match self.backend.connect().await {
            Ok(store) => {
                self.set_state(ConnectionState::Connected);
                info!(store = %self.backend.describe(), "connected to store");
                Ok(store)
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                error!(error = %e, store = %self.backend.describe(), "store connection error");
                Err(e)
            }
        }
    }
}
