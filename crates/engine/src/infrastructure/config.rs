//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_DATABASE_URL: &str = "sqlite:armory.db?mode=rwc";

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "mem" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("unknown STORAGE backend '{other}' (expected memory or sqlite)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub seed_file: Option<PathBuf>,
    /// `*` or a comma separated origin list; `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(port) => port
                .parse()
                .with_context(|| format!("invalid server port '{port}'"))?,
            None => DEFAULT_PORT,
        };
        let storage = match get("STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::Memory,
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            server_port,
            storage,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            seed_file: get("SEED_FILE").map(PathBuf::from),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server_host, self.server_port);
        addr.parse()
            .with_context(|| format!("invalid listen address '{addr}'"))
    }
}

/// Load `.env.local` then `.env` from `dir`, without overriding variables
/// that are already set.
pub fn load_dotenv_from(dir: &Path) {
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}
