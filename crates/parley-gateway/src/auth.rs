// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token issuance/verification and operator password hashing.
//!
//! Session tokens are HMAC-SHA256 signed: `base64url(identity-json).hex(mac)`.
//! Verification is fail-closed; a connection is refused before any state
//! mutation. Operator passwords are argon2id PHC strings checked against
//! the `operators` table at login.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use parley_core::{Identity, IdentityVerifier, ParleyError};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies HMAC-signed session tokens.
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Sign an identity into a bearer token.
    pub fn issue(&self, identity: &Identity) -> Result<String, ParleyError> {
        let payload = serde_json::to_string(identity)
            .map_err(|e| ParleyError::Internal(format!("token payload: {e}")))?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| ParleyError::Internal(format!("hmac init: {e}")))?;
        mac.update(encoded.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{encoded}.{signature}"))
    }
}

impl IdentityVerifier for TokenSigner {
    fn verify(&self, credential: &str) -> Result<Identity, ParleyError> {
        let (encoded, signature_hex) = credential
            .split_once('.')
            .ok_or_else(|| ParleyError::Auth("malformed token".to_string()))?;
        let signature = hex::decode(signature_hex)
            .map_err(|_| ParleyError::Auth("malformed signature".to_string()))?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| ParleyError::Internal(format!("hmac init: {e}")))?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| ParleyError::Auth("invalid signature".to_string()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| ParleyError::Auth("malformed payload".to_string()))?;
        serde_json::from_slice(&payload)
            .map_err(|_| ParleyError::Auth("malformed payload".to_string()))
    }
}

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ParleyError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ParleyError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC string. Any parse or mismatch
/// failure is a plain `false`.
pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Role;

    #[test]
    fn issued_token_verifies_round_trip() {
        let signer = TokenSigner::new("test-secret");
        let identity = Identity::operator("bob", "Bob");
        let token = signer.issue(&identity).unwrap();

        let verified = signer.verify(&token).unwrap();
        assert_eq!(verified.role, Role::Operator);
        assert_eq!(verified.display_name, "Bob");
        assert_eq!(verified.login.as_deref(), Some("bob"));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue(&Identity::client("Alice")).unwrap();

        // Flip the payload: the signature no longer matches.
        let forged_payload = URL_SAFE_NO_PAD.encode(r#"{"role":"operator","display_name":"Alice","login":"alice"}"#);
        let signature = token.split_once('.').unwrap().1;
        let forged = format!("{forged_payload}.{signature}");
        assert!(matches!(signer.verify(&forged), Err(ParleyError::Auth(_))));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let signer = TokenSigner::new("secret-a");
        let other = TokenSigner::new("secret-b");
        let token = signer.issue(&Identity::client("Alice")).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let signer = TokenSigner::new("test-secret");
        assert!(signer.verify("").is_err());
        assert!(signer.verify("no-dot-here").is_err());
        assert!(signer.verify("abc.not-hex").is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let signer = TokenSigner::new("super-secret");
        let debug = format!("{signer:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "wrong"));
        assert!(!verify_password("not-a-phc-string", "hunter2"));
    }
}
