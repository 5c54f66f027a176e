// ABOUTME: Environment-driven configuration helpers for Folio
// ABOUTME: Variable names plus small typed readers used by the binary

pub mod constants;

use std::env;
use std::str::FromStr;
use tracing::warn;

pub use constants::*;

/// Read an environment variable, falling back to a legacy name when unset.
pub fn env_with_fallback(primary: &str, legacy: &str) -> Option<String> {
    env::var(primary).or_else(|_| env::var(legacy)).ok()
}

/// Parse an environment variable into `T`, returning `default` when unset or invalid.
pub fn parse_env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value for {}: {:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}
