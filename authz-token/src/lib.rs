//! Bearer-token authentication for the authz engine
//!
//! Verifies a signed bearer token's signature, lifetime, issuer and audience,
//! and extracts the scope/permission claim the pipeline checks operations
//! against. Signing keys are resolved by key id through the [`KeyProvider`]
//! abstraction; remote JWK-set fetching and refreshing stays behind that
//! trait, outside this crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use authz_token::{StaticKeyProvider, TokenValidator, ValidatorConfig};
//! use std::sync::Arc;
//!
//! let keys = StaticKeyProvider::new();
//! let config = ValidatorConfig::new("https://issuer.example.com", "api");
//! let validator = TokenValidator::new(config, Arc::new(keys));
//! # let _ = validator;
//! ```

pub mod error;
pub mod fake;
pub mod keyset;
pub mod validator;

pub use error::{Result, TokenError};
pub use fake::FakeSigner;
pub use keyset::{KeyProvider, StaticKeyProvider, VerificationKey};
pub use validator::{
    bearer_token, has_required_scopes, TokenValidator, ValidatorConfig, DEFAULT_SCOPE_CLAIM,
};
