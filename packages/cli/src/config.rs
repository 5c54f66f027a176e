use folio_config::{
    env_with_fallback, parse_env_or, FOLIO_API_HOST, FOLIO_API_PORT, FOLIO_CORS_ORIGIN,
    FOLIO_DATABASE_PATH, FOLIO_DB_MAX_CONNECTIONS, PORT,
};
use folio_storage::DatabaseConfig;
use std::env;
use std::net::{AddrParseError, IpAddr, Ipv4Addr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 4100;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(#[from] AddrParseError),
    #[error("Database pool needs at least one connection")]
    NoConnections,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env_with_fallback(FOLIO_API_PORT, PORT) {
            Some(raw) => raw.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };

        let host = match env::var(FOLIO_API_HOST) {
            Ok(raw) => raw.trim().parse::<IpAddr>()?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let cors_origin =
            env::var(FOLIO_CORS_ORIGIN).unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let database_path = env::var(FOLIO_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let db_max_connections = parse_env_or(FOLIO_DB_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS);

        let config = Config {
            port,
            host,
            cors_origin,
            database_path,
            db_max_connections,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that may also arrive from command-line overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::PortOutOfRange(self.port));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            path: self.database_path.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

fn default_database_path() -> PathBuf {
    DatabaseConfig::default().path
}
