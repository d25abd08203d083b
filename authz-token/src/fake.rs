//! Fake token signer for tests.
//!
//! Signs tokens with a fixed HMAC secret and key id so validator and
//! pipeline tests can mint credentials without a remote issuer. A test
//! double, not an issuance feature.

use crate::keyset::{StaticKeyProvider, VerificationKey};
use crate::validator::{TokenValidator, ValidatorConfig};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;

pub const FAKE_KEY_ID: &str = "fake-key-id";
pub const FAKE_ISSUER: &str = "fake-issuer";
pub const FAKE_AUDIENCE: &str = "fake-users";

const FAKE_SECRET: &[u8] = b"fake-signing-secret";

/// Signs bearer tokens for tests and hands out the matching key provider
/// and validator.
#[derive(Debug, Clone)]
pub struct FakeSigner {
    key_id: String,
}

impl FakeSigner {
    pub fn new() -> Self {
        Self::with_key_id(FAKE_KEY_ID)
    }

    /// A signer advertising a different key id, for unknown-kid tests.
    pub fn with_key_id(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }

    /// Sign an arbitrary claim set.
    pub fn sign(&self, claims: &Value) -> Result<String, jsonwebtoken::errors::Error> {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.key_id.clone());

        encode(&header, claims, &EncodingKey::from_secret(FAKE_SECRET))
    }

    /// A well-formed claim set for the fake issuer/audience, valid for one
    /// hour.
    pub fn standard_claims(&self, subject: &str, scopes: &[&str]) -> Value {
        let now = Utc::now().timestamp();

        json!({
            "iss": FAKE_ISSUER,
            "aud": FAKE_AUDIENCE,
            "sub": subject,
            "iat": now,
            "exp": now + 3600,
            "scope": scopes.join(" "),
        })
    }

    /// Key provider that recognizes this signer's key.
    pub fn key_provider(&self) -> StaticKeyProvider {
        StaticKeyProvider::new().with_key(
            self.key_id.clone(),
            VerificationKey::new(Algorithm::HS256, DecodingKey::from_secret(FAKE_SECRET)),
        )
    }

    /// Validator wired for the fake issuer, audience and key.
    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(
            ValidatorConfig::new(FAKE_ISSUER, FAKE_AUDIENCE),
            Arc::new(self.key_provider()),
        )
    }
}

impl Default for FakeSigner {
    fn default() -> Self {
        Self::new()
    }
}
