//! Decision pipeline for the authz engine
//!
//! Orchestrates one authorization decision per request:
//! token validation, scope checks, entity resolution and the configured
//! checker, in that order, failing fast at every stage. The resolved
//! `(principal, object, action)` triple is returned explicitly to the caller
//! on a grant; nothing is stashed in ambient state.
//!
//! # Example
//!
//! ```rust,no_run
//! use authz_core::NoopChecker;
//! use authz_gateway::DecisionPipeline;
//! use authz_token::{StaticKeyProvider, TokenValidator, ValidatorConfig};
//! use std::sync::Arc;
//!
//! let validator = TokenValidator::new(
//!     ValidatorConfig::new("https://issuer.example.com", "api"),
//!     Arc::new(StaticKeyProvider::new()),
//! );
//!
//! // Denies everything until resolvers and a real checker are configured.
//! let pipeline = DecisionPipeline::new(validator)
//!     .with_checker(Arc::new(NoopChecker::new()))
//!     .with_required_scopes(["read"]);
//! # let _ = pipeline;
//! ```

pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod resolve;

pub use error::{DecisionError, DecisionStatus, ResolveError};
pub use metadata::{
    AuthzMetadata, Component, ComponentLocation, EntityOption, MissingMetadataPolicy,
};
pub use pipeline::{Decision, DecisionChain, DecisionPipeline};
pub use resolve::{
    ActionResolver, BuilderActionResolver, BuilderObjectResolver, ClaimsPrincipalResolver,
    NoopActionResolver, NoopObjectResolver, NoopPrincipalResolver, ObjectResolver,
    PrincipalResolver, ResolveContext,
};
