//! Per-operation authorization metadata.
//!
//! An external declarative extension attached to each API operation describes
//! how to assemble the decision triple for that operation:
//!
//! ```json
//! {
//!     "user": { "namespace": "user" },
//!     "object": {
//!         "namespace": "team",
//!         "separator": "/",
//!         "components": [ { "in": "path", "name": "team" } ]
//!     },
//!     "relation": { "namespace": "", "name": "read" }
//! }
//! ```
//!
//! Loaded once per operation definition, immutable thereafter. An operation
//! carrying no metadata is itself meaningful; the policy for it is explicit
//! configuration, never an implicit allow.

use crate::resolve::{BuilderActionResolver, BuilderObjectResolver, ClaimsPrincipalResolver};
use authz_core::{EntityBuilder, ParamLocation, DEFAULT_JOIN_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Where a component of the object identifier comes from.
///
/// Unrecognized locations deserialize to [`ComponentLocation::Unknown`] and
/// contribute an empty segment — the same degradation as an unresolved
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentLocation {
    Path,
    Query,
    #[serde(other)]
    Unknown,
}

/// One component of an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "in")]
    pub location: ComponentLocation,
    pub name: String,
}

/// Declarative description of one entity of the triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityOption {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// The full per-operation authorization metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzMetadata {
    #[serde(default)]
    pub user: EntityOption,
    #[serde(default)]
    pub object: EntityOption,
    #[serde(default)]
    pub relation: EntityOption,
}

/// What to do with an operation that carries no authorization metadata.
///
/// Deny is the default: absent metadata routes through the Noop checker,
/// which grants nothing. Bypass marks the operation public and skips
/// authentication entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMetadataPolicy {
    #[default]
    Deny,
    Bypass,
}

impl AuthzMetadata {
    /// Resolver for the acting user: `<namespace>:<sub>`.
    pub fn principal_resolver(&self) -> ClaimsPrincipalResolver {
        ClaimsPrincipalResolver::with_namespace(self.user.namespace.clone())
    }

    /// Resolver for the object identifier: namespace, static name, then the
    /// configured components joined by the separator.
    pub fn object_resolver(&self) -> BuilderObjectResolver {
        let separator = self
            .object
            .separator
            .as_deref()
            .unwrap_or(DEFAULT_JOIN_SEPARATOR);

        let mut builder = EntityBuilder::new()
            .namespace(self.object.namespace.as_str())
            .literal(self.object.name.as_str());

        for (position, component) in self.object.components.iter().enumerate() {
            if position > 0 {
                builder = builder.literal(separator);
            }

            builder = match component.location {
                ComponentLocation::Path => {
                    builder.request_param(ParamLocation::Path, component.name.as_str(), "")
                }
                ComponentLocation::Query => {
                    builder.request_param(ParamLocation::Query, component.name.as_str(), "")
                }
                ComponentLocation::Unknown => builder.literal(""),
            };
        }

        BuilderObjectResolver::new(builder)
    }

    /// Resolver for the relation/action: namespace plus the static name.
    pub fn action_resolver(&self) -> BuilderActionResolver {
        BuilderActionResolver::new(
            EntityBuilder::new()
                .namespace(self.relation.namespace.as_str())
                .literal(self.relation.name.as_str()),
        )
    }
}
