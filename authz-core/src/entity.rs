use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a namespace and the rest of an entity string.
pub const NAMESPACE_SEPARATOR: &str = ":";

/// Default separator for path-like identifier segments.
pub const DEFAULT_JOIN_SEPARATOR: &str = "/";

/// The identity performing an action, e.g. `user:42` or `api_key:018f...`.
///
/// The empty string is the no-op sentinel; backends must never treat it as a
/// grantable identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

/// The resource being acted upon, e.g. `team:acme` or `document:doc1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Object(String);

/// The operation, permission or relation being checked, e.g. `read` or
/// `editor`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

macro_rules! entity_impl {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The no-op sentinel entity. Always evaluates to deny unless a
            /// backend explicitly special-cases it.
            pub fn none() -> Self {
                Self(String::new())
            }

            pub fn is_none(&self) -> bool {
                self.0.is_empty()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The identifier portion after the first namespace separator.
            ///
            /// `user:42` yields `42`, `user:bar/baz` yields `bar/baz`, and a
            /// value without a namespace is returned unchanged. Relational
            /// backends key on this; the tuple backend sends [`Self::as_str`]
            /// verbatim.
            pub fn id(&self) -> &str {
                match self.0.split_once(NAMESPACE_SEPARATOR) {
                    Some((_, id)) => id,
                    None => &self.0,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

entity_impl!(Principal);
entity_impl!(Object);
entity_impl!(Action);

/// The resolved triple attached to a request after a successful decision.
///
/// Read-only to downstream consumers and scoped to the lifetime of one
/// request. The pipeline returns it explicitly rather than stashing it in an
/// ambient, untyped context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzContext {
    pub principal: Principal,
    pub object: Object,
    pub action: Action,
}

impl AuthzContext {
    pub fn new(principal: Principal, object: Object, action: Action) -> Self {
        Self {
            principal,
            object,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_strips_the_namespace() {
        assert_eq!(Principal::new("user:42").id(), "42");
        assert_eq!(Object::new("team:acme").id(), "acme");
        assert_eq!(Principal::new("user:bar/baz").id(), "bar/baz");
    }

    #[test]
    fn id_without_namespace_is_unchanged() {
        assert_eq!(Action::new("read").id(), "read");
    }

    #[test]
    fn sentinel_is_empty() {
        let principal = Principal::none();
        assert!(principal.is_none());
        assert_eq!(principal.as_str(), "");
        assert_eq!(principal.id(), "");
    }
}
