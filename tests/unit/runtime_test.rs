//! Tests for token issuance

use std::time::Duration;

use jsonwebtoken::{decode, DecodingKey, Validation};
use lunar_dispatch::config::SecretKey;
use lunar_dispatch::core::Payload;
use lunar_dispatch::runtime::{payload_hash, TokenClaims, TokenIssuer};
use lunar_dispatch::util::now_secs;
use serde_json::json;

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_claims_expire_after_ttl() {
    let issuer = TokenIssuer::new(SecretKey::new("k"), Duration::from_secs(120));
    let before = now_secs();
    let claims = issuer.claims_for(&payload(json!({"a": 1})));

    assert!(claims.exp >= before + 120);
    assert!(claims.exp <= now_secs() + 120);
    assert_eq!(claims.hash, payload_hash(&payload(json!({"a": 1}))));
}

#[test]
fn test_different_payloads_hash_differently() {
    assert_ne!(
        payload_hash(&payload(json!({"a": 1}))),
        payload_hash(&payload(json!({"a": 2})))
    );
    assert_eq!(payload_hash(&Payload::new()).len(), 64);
}

#[test]
fn test_issued_token_round_trips_claims() {
    let issuer = TokenIssuer::new(SecretKey::new("k"), Duration::from_secs(60));
    let body = payload(json!({"user": "grace"}));
    let token = issuer.issue(&body).unwrap();

    let data = decode::<TokenClaims>(
        &token,
        &DecodingKey::from_secret(b"k"),
        &Validation::default(),
    )
    .unwrap();
    assert_eq!(data.claims.hash, payload_hash(&body));
}
