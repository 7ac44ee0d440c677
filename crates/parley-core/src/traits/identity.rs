// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity verifier trait.
//!
//! Credential issuance (password checks, token minting) is an external
//! collaborator; the core only consumes verification.

use crate::error::ParleyError;
use crate::types::Identity;

/// Turns a presented credential into a verified [`Identity`].
///
/// A failed verification must refuse the connection before any state
/// mutation.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<Identity, ParleyError>;
}
