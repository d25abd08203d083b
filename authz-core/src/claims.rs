use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Decoded, validated payload of a bearer token.
///
/// Produced by the token validator after signature, lifetime, issuer and
/// audience checks have passed. Scopes keep their original order and may
/// contain duplicates; matching is set membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The `sub` claim, if present.
    pub subject: Option<String>,
    /// The `iss` claim, if present.
    pub issuer: Option<String>,
    /// The `aud` claim, normalized to a list.
    pub audience: Vec<String>,
    /// The `exp` claim as seconds since the epoch.
    pub expires_at: Option<i64>,
    /// The `nbf` claim as seconds since the epoch.
    pub not_before: Option<i64>,
    /// The `iat` claim as seconds since the epoch.
    pub issued_at: Option<i64>,
    /// The scope/permission claim, normalized to a list of strings.
    pub scopes: Vec<String>,
    /// Remaining custom claims, available to the entity builder.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Scope list as a set, for membership checks.
    pub fn scope_set(&self) -> HashSet<&str> {
        self.scopes.iter().map(String::as_str).collect()
    }

    /// Look up a string-valued claim by name.
    ///
    /// `sub` resolves the subject; any other name is looked up among the
    /// custom claims and resolves only if the value is a JSON string.
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        if name == "sub" {
            return self.subject.as_deref();
        }

        self.extra.get(name).and_then(|value| value.as_str())
    }
}
