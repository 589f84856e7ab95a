use std::{path::PathBuf, str::FromStr};

use anyhow::Context;

use crate::{store::ConnectMode, users::password::PasswordStorage};

/// Whether the process owns a listener or only hands its router to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Listen,
    Embedded,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "listen" | "development" => Ok(Self::Listen),
            "embedded" | "production" => Ok(Self::Embedded),
            other => anyhow::bail!("unknown run mode {other:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub db_name: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub connect_mode: ConnectMode,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub run_mode: RunMode,
    pub store: StoreConfig,
    pub passwords: PasswordStorage,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("APP_PORT").or_else(|| get("PORT")) {
            Some(v) => v.trim().parse::<u16>().context("APP_PORT/PORT must be a port number")?,
            None => 3000,
        };

        let store = StoreConfig {
            url: get("DATABASE_URL").context("DATABASE_URL is not set")?,
            db_name: get("DB_NAME"),
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            connect_timeout_secs: get("DB_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
            connect_mode: get("STORE_CONNECT_MODE")
                .map(|v| v.parse::<ConnectMode>())
                .transpose()?
                .unwrap_or(ConnectMode::ReconnectOnDemand),
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            run_mode: get("RUN_MODE")
                .map(|v| v.parse::<RunMode>())
                .transpose()?
                .unwrap_or(RunMode::Listen),
            store,
            passwords: get("PASSWORD_STORAGE")
                .map(|v| v.parse::<PasswordStorage>())
                .transpose()?
                .unwrap_or_default(),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}
