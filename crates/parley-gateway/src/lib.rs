// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Parley support-chat router.
//!
//! The gateway owns the outer surface: login token issuance, the REST
//! endpoints backing the UIs, and the WebSocket bridge that turns sockets
//! into router connections. Routing semantics live entirely in
//! `parley-router`; the gateway never mutates queue or session state
//! directly.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod ws;

pub use auth::{hash_password, verify_password, TokenSigner};
pub use server::{build_router, start_server, GatewayConfig, GatewayState};
