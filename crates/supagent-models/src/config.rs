use serde::{Deserialize, Serialize};

/// Top-level configuration for the supagent server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SupagentConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Created with the schema if missing.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    /// How long a connection waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_sqlite_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Shared-secret settings. The key is taken from `api_key` when set,
/// otherwise from the environment variable named by `api_key_env` (filled in
/// at startup by the secrets fetcher).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl AuthConfig {
    /// Resolve the shared secret. Blank values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_sqlite_path() -> String {
    "data/supagent.db".to_string()
}
fn default_busy_timeout() -> u64 {
    5_000
}
fn default_api_key_env() -> String {
    "SUPAGENT_API_KEY".to_string()
}
