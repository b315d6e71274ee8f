//! Configuration module for the CodeHunt backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which team store implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map, lost on restart.
    Memory,
    /// SQLite file on disk.
    Sqlite,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Some(StorageBackend::Memory),
            "sqlite" => Some(StorageBackend::Sqlite),
            _ => None,
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the admin routes
    pub admin_psk: Option<String>,
    /// Selected team store
    pub storage: StorageBackend,
    /// Path to SQLite database file (sqlite storage only)
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_psk = lookup("CODEHUNT_ADMIN_PSK").filter(|k| !k.is_empty());

        let storage_raw = lookup("CODEHUNT_STORAGE").unwrap_or_else(|| "memory".to_string());
        let storage = StorageBackend::parse(&storage_raw)
            .ok_or_else(|| format!("Invalid CODEHUNT_STORAGE value: {}", storage_raw))?;

        let db_path = lookup("CODEHUNT_DB_PATH")
            .unwrap_or_else(|| "./data/codehunt.sqlite".to_string())
            .into();

        let bind_raw =
            lookup("CODEHUNT_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| format!("Invalid CODEHUNT_BIND_ADDR format: {}", bind_raw))?;

        let log_level = lookup("CODEHUNT_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("CODEHUNT_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(format!("Invalid CODEHUNT_LOG_FORMAT value: {}", other)),
        };

        Ok(Self {
            admin_psk,
            storage,
            db_path,
            bind_addr,
            log_level,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert!(config.admin_psk.is_none());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.db_path, PathBuf::from("./data/codehunt.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_sqlite_storage_selected() {
        let config = Config::from_lookup(lookup_from(&[
            ("CODEHUNT_STORAGE", "SQLite"),
            ("CODEHUNT_DB_PATH", "/tmp/hunt.sqlite"),
            ("CODEHUNT_ADMIN_PSK", "secret"),
            ("CODEHUNT_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("/tmp/hunt.sqlite"));
        assert_eq!(config.admin_psk.as_deref(), Some("secret"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(StorageBackend::parse(" SQLite "), Some(StorageBackend::Sqlite));
        assert_eq!(StorageBackend::parse("in-memory"), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("postgres"), None);
    }

    #[test]
    fn test_empty_psk_disables_guard() {
        let config = Config::from_lookup(lookup_from(&[("CODEHUNT_ADMIN_PSK", "")])).unwrap();
        assert!(config.admin_psk.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup_from(&[("CODEHUNT_STORAGE", "firestore")]))
            .unwrap_err();
        assert!(err.contains("CODEHUNT_STORAGE"));

        let err = Config::from_lookup(lookup_from(&[("CODEHUNT_BIND_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(err.contains("CODEHUNT_BIND_ADDR"));
    }
}
