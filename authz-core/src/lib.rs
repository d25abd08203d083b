//! Core types and contracts for the authz engine
//!
//! This crate carries everything the backend crates agree on:
//!
//! - **Principal**: the identity performing an action (a user or an API key)
//! - **Object**: the resource being acted upon
//! - **Action**: the operation, permission or relation being checked
//! - **Checker**: the `allowed(principal, object, action)` decision contract
//! - **EntityBuilder**: a small declarative DSL that assembles namespaced
//!   entity strings from literals, request parameters and token claims
//!
//! A decision backend implements [`Checker`]; everything else in the engine
//! is plumbing that produces the three entity strings and routes the verdict.
//!
//! # Example
//!
//! ```rust
//! use authz_core::{BuildContext, EntityBuilder};
//!
//! let builder = EntityBuilder::new().namespace("user").literal("42");
//! let principal = builder.build_principal(&BuildContext::empty());
//! assert_eq!(principal.as_str(), "user:42");
//! ```

pub mod builder;
pub mod checker;
pub mod claims;
pub mod entity;
pub mod error;
pub mod request;

pub use builder::{BuildContext, BuildError, EntityBuilder, ParamLocation, Step};
pub use checker::{Checker, FakeChecker, NoopChecker};
pub use claims::Claims;
pub use entity::{Action, AuthzContext, Object, Principal, DEFAULT_JOIN_SEPARATOR, NAMESPACE_SEPARATOR};
pub use error::{CheckError, Result};
pub use request::AuthRequest;
