// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation on top of the serde-level parse.

use thiserror::Error;

use crate::model::ParleyConfig;

/// A configuration value that parsed but cannot be served with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("auth.token_secret must be set to serve (connections are refused without it)")]
    MissingTokenSecret,

    #[error("routing.zones must list at least one zone")]
    NoZones,

    #[error("operators.seed[{0}]: username and password must be non-empty")]
    EmptySeedCredential(usize),
}

/// Validate everything the serve path depends on. Returns all problems, not
/// just the first.
pub fn validate(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config
        .auth
        .token_secret
        .as_deref()
        .is_none_or(|s| s.is_empty())
    {
        errors.push(ConfigError::MissingTokenSecret);
    }

    if config.routing.zones.is_empty() {
        errors.push(ConfigError::NoZones);
    }

    for (i, seed) in config.operators.seed.iter().enumerate() {
        if seed.username.is_empty() || seed.password.is_empty() {
            errors.push(ConfigError::EmptySeedCredential(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
