//! Relationship-tuple checker for the authz engine
//!
//! Access is derived from a graph of `(user, relation, object)` tuples
//! evaluated by an external relationship store. The engine never persists
//! tuples; it constructs one check body per decision, submits it verbatim,
//! and passes the store's boolean verdict through unchanged. A transport
//! failure is a checker error, never a silent deny.

pub mod checker;
pub mod client;

pub use checker::RelationshipChecker;
pub use client::{HttpRelationshipClient, InMemoryRelationshipClient, RelationshipClient};
