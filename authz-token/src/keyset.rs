use crate::error::{Result, TokenError};
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey};
use std::collections::HashMap;
use tracing::debug;

/// A verification key together with the algorithm it verifies.
#[derive(Clone)]
pub struct VerificationKey {
    pub algorithm: Algorithm,
    pub key: DecodingKey,
}

impl VerificationKey {
    pub fn new(algorithm: Algorithm, key: DecodingKey) -> Self {
        Self { algorithm, key }
    }
}

/// Resolves signing keys by the token's key-identifier header field.
///
/// The validator treats this as a black box: an implementation may serve a
/// local cache, or block on a remote key-set refresh the first time a new key
/// id is seen. An unknown key id is a signature failure, not an
/// infrastructure error.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn key_for(&self, kid: &str) -> Result<VerificationKey>;
}

/// Key provider over an already-fetched key set.
///
/// Holds keys registered programmatically or parsed out of a JWKS document.
/// Refreshing the document is the caller's business; swap in a fresh provider
/// when the set changes.
#[derive(Clone, Default)]
pub struct StaticKeyProvider {
    keys: HashMap<String, VerificationKey>,
}

impl StaticKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: VerificationKey) -> Self {
        self.keys.insert(kid.into(), key);
        self
    }

    /// Build a provider from a JWKS document.
    ///
    /// Keys without a key id or a recognized signing algorithm are skipped;
    /// a token referencing one of them fails signature verification like any
    /// other unknown key id.
    pub fn from_jwks(set: &JwkSet) -> Self {
        let mut provider = Self::new();

        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                debug!("skipping JWK without a key id");
                continue;
            };

            let Some(algorithm) = jwk
                .common
                .key_algorithm
                .and_then(|alg| alg.to_string().parse::<Algorithm>().ok())
            else {
                debug!(kid = %kid, "skipping JWK without a signing algorithm");
                continue;
            };

            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    provider
                        .keys
                        .insert(kid, VerificationKey::new(algorithm, key));
                }
                Err(err) => {
                    debug!(kid = %kid, error = %err, "skipping unusable JWK");
                }
            }
        }

        provider
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn key_for(&self, kid: &str) -> Result<VerificationKey> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or(TokenError::InvalidSignature)
    }
}
