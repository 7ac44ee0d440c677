// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley support-chat router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup instead of silently ignoring typos.

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values, except `auth.token_secret` which must be set to serve.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// HTTP/WebSocket server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token signing and credential settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Routing engine settings (zones, redelivery delay, abandonment rating).
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Operator accounts seeded at startup if absent.
    #[serde(default)]
    pub operators: OperatorsConfig,
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Token signing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. `None` refuses all connections
    /// (fail-closed).
    #[serde(default)]
    pub token_secret: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "parley.db".to_string()
}

/// Routing engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Zones offered to clients. A label partitioning clients for routing
    /// and display, not an isolation boundary.
    #[serde(default = "default_zones")]
    pub zones: Vec<String>,

    /// Delay before redelivering message history to a freshly joined
    /// operator, giving its UI time to mount.
    #[serde(default = "default_history_replay_delay_ms")]
    pub history_replay_delay_ms: u64,

    /// Placeholder rating recorded when a session is closed by
    /// disconnection rather than an explicit score.
    #[serde(default = "default_abandon_rating")]
    pub abandon_rating: i64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            history_replay_delay_ms: default_history_replay_delay_ms(),
            abandon_rating: default_abandon_rating(),
        }
    }
}

fn default_zones() -> Vec<String> {
    vec!["General".to_string()]
}

fn default_history_replay_delay_ms() -> u64 {
    500
}

fn default_abandon_rating() -> i64 {
    1
}

/// Operator seeding configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorsConfig {
    /// Accounts created at startup if the username does not exist yet.
    /// Passwords are hashed before storage and never persisted in clear.
    #[serde(default)]
    pub seed: Vec<OperatorSeed>,
}

/// One seeded operator account.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorSeed {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ParleyConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.database_path, "parley.db");
        assert_eq!(config.routing.zones, vec!["General".to_string()]);
        assert_eq!(config.routing.history_replay_delay_ms, 500);
        assert_eq!(config.routing.abandon_rating, 1);
        assert!(config.auth.token_secret.is_none());
        assert!(config.operators.seed.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ServerConfig, _> =
            toml::from_str("host = \"0.0.0.0\"\nbogus = true\n");
        assert!(result.is_err());
    }
}
