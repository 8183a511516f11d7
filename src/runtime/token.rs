//! Bearer token issuance for `POST /token`.
//!
//! Tokens are HS256-signed JWTs whose `hash` claim is the SHA-256 hex digest
//! of the compact JSON encoding of the submitted payload.

use std::time::Duration;

use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::{SecretKey, ServerConfig};
use crate::core::Payload;
use crate::util::clock::now_secs;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// SHA-256 hex digest of the payload.
    pub hash: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Signs tokens with the configured secret.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: SecretKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Issue tokens signed with `secret` that expire after `ttl`.
    #[must_use]
    pub const fn new(secret: SecretKey, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issuer configured from the server settings.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.secret_key.clone(), config.token_ttl)
    }

    /// Claims for `payload` as of now.
    #[must_use]
    pub fn claims_for(&self, payload: &Payload) -> TokenClaims {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        TokenClaims {
            hash: payload_hash(payload),
            exp: now_secs().saturating_add(ttl),
        }
    }

    /// Sign a token for `payload`.
    ///
    /// # Errors
    ///
    /// Returns the signing error from `jsonwebtoken`.
    pub fn issue(&self, payload: &Payload) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(), // HS256
            &self.claims_for(payload),
            &EncodingKey::from_secret(self.secret.expose()),
        )
    }
}

/// SHA-256 hex digest of the payload's compact JSON form. Keys serialize in
/// sorted order, so equal payloads hash equally.
///
/// The bytes are exactly what `serde_json` writes: `<`, `>` and `&` stay
/// literal and floats keep their fraction (`1.0`, not `1`). Hashes therefore
/// differ from encoders that HTML-escape strings or print floats as integers,
/// so only compare against hashes produced by this function.
#[must_use]
pub fn payload_hash(payload: &Payload) -> String {
    let mut hasher = Sha256::new();
    // Serializing a string-keyed JSON map cannot fail.
    let bytes = serde_json::to_vec(payload).unwrap_or_default();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SecretKey::new("test-secret"), Duration::from_secs(3600))
    }

    #[test]
    fn hash_ignores_key_order() {
        let a = payload(json!({"b": 2, "a": 1}));
        let b = payload(json!({"a": 1, "b": 2}));
        assert_eq!(payload_hash(&a), payload_hash(&b));
        assert_eq!(payload_hash(&a).len(), 64);
    }

    #[test]
    fn hash_of_empty_object() {
        // sha256("{}")
        assert_eq!(
            payload_hash(&Payload::new()),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn hash_covers_unescaped_compact_json() {
        // sha256(r#"{"a":"<&>","n":1.0}"#)
        let body = payload(json!({"n": 1.0, "a": "<&>"}));
        assert_eq!(
            payload_hash(&body),
            "687292aa5226d211c3165bd9b35d470cda8b71fc47a933f4305b6d8d5ec64af6"
        );
        assert_ne!(payload_hash(&body), payload_hash(&payload(json!({"n": 1, "a": "<&>"}))));
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let body = payload(json!({"user": "alice"}));
        let token = issuer().issue(&body).unwrap();

        let data = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.hash, payload_hash(&body));
        assert!(data.claims.exp > now_secs());
    }

    #[test]
    fn issued_token_fails_with_other_secret() {
        let token = issuer().issue(&Payload::new()).unwrap();
        let result = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
