// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server wiring: storage, router actor, and gateway.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use parley_config::{OperatorSeed, ParleyConfig};
use parley_core::{Operator, ParleyError, StorageAdapter};
use parley_gateway::{start_server, GatewayConfig, GatewayState, TokenSigner};
use parley_router::{RouterActor, RouterConfig};
use parley_storage::SqliteStorage;

/// Bring the whole stack up and serve until the process exits.
pub async fn run(config: ParleyConfig) -> Result<(), ParleyError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let dyn_storage: Arc<dyn StorageAdapter> = storage;
    seed_operators(dyn_storage.as_ref(), &config.operators.seed).await?;

    let router_config = RouterConfig {
        history_replay_delay: Duration::from_millis(config.routing.history_replay_delay_ms),
        abandon_rating: config.routing.abandon_rating,
        default_zone: config
            .routing
            .zones
            .first()
            .cloned()
            .unwrap_or_else(|| "General".to_string()),
    };
    let (router, _actor) = RouterActor::spawn(Arc::clone(&dyn_storage), router_config);

    let secret = config
        .auth
        .token_secret
        .as_deref()
        .ok_or_else(|| ParleyError::Config("auth.token_secret is required".to_string()))?;

    let state = GatewayState {
        router,
        storage: dyn_storage,
        signer: Arc::new(TokenSigner::new(secret)),
        zones: config.routing.zones.clone(),
        start_time: std::time::Instant::now(),
    };

    let gateway_config = GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&gateway_config, state).await
}

/// Create configured operator accounts that do not exist yet. Passwords are
/// hashed here; the clear text never reaches storage.
async fn seed_operators(
    storage: &dyn StorageAdapter,
    seeds: &[OperatorSeed],
) -> Result<(), ParleyError> {
    for seed in seeds {
        if storage.find_operator(&seed.username).await?.is_some() {
            continue;
        }
        let password_hash = parley_gateway::hash_password(&seed.password)?;
        storage
            .create_operator(&Operator {
                username: seed.username.to_lowercase(),
                display_name: seed.display_name.clone(),
                password_hash,
            })
            .await?;
        info!(username = %seed.username, "operator account seeded");
    }
    Ok(())
}
