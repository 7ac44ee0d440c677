// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Parley support-chat router.
//!
//! Layered TOML + environment loading via Figment, with semantic validation
//! on top of the serde-level parse.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AuthConfig, OperatorSeed, OperatorsConfig, ParleyConfig, RoutingConfig, ServerConfig,
    StorageConfig,
};
pub use validation::{validate, ConfigError};

/// Load from the XDG hierarchy and validate in one step.
pub fn load_and_validate() -> Result<ParleyConfig, Vec<String>> {
    let config = load_config().map_err(|e| vec![e.to_string()])?;
    validate(&config)
        .map_err(|errors| errors.into_iter().map(|e| e.to_string()).collect::<Vec<_>>())?;
    Ok(config)
}
