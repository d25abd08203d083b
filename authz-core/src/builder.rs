//! Declarative builder for namespaced entity strings.
//!
//! A builder is an ordered sequence of string-producing steps; building is
//! pure left-to-right concatenation of the step outputs. No escaping or
//! quoting is performed — callers must ensure component values do not contain
//! the separator if uniqueness matters downstream.

use crate::claims::Claims;
use crate::entity::{Action, Object, Principal, NAMESPACE_SEPARATOR};
use crate::request::AuthRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a request-sourced component lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
}

/// One string-producing step of a builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Emits the string unchanged.
    Literal(String),
    /// Emits `name<separator>`; an empty name emits nothing.
    Namespace { name: String, separator: String },
    /// Emits the values joined by the separator.
    Join {
        separator: String,
        values: Vec<String>,
    },
    /// Emits the named request parameter, or the default when unresolved.
    RequestParam {
        location: ParamLocation,
        name: String,
        default: String,
    },
    /// Emits a string claim value from the validated token claims.
    Claim { name: String },
}

/// Inputs a builder may draw from at request time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildContext<'a> {
    pub request: Option<&'a AuthRequest>,
    pub claims: Option<&'a Claims>,
}

impl<'a> BuildContext<'a> {
    /// A context with no request and no claims; dynamic steps resolve to
    /// their defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(request: &'a AuthRequest, claims: &'a Claims) -> Self {
        Self {
            request: Some(request),
            claims: Some(claims),
        }
    }

    pub fn with_request(mut self, request: &'a AuthRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_claims(mut self, claims: &'a Claims) -> Self {
        self.claims = Some(claims);
        self
    }
}

/// Error from [`EntityBuilder::build_strict`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("required request parameter is missing: {0}")]
    MissingParameter(String),
}

/// Composes one entity string out of ordered generator steps.
///
/// An unresolved request parameter yields its default (the empty string
/// unless configured otherwise), never an error: a malformed operation
/// configuration degrades to an identifier with an empty segment rather than
/// failing the request. Use [`EntityBuilder::build_strict`] where the
/// contract demands an error instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBuilder {
    steps: Vec<Step>,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(mut self, value: impl Into<String>) -> Self {
        self.steps.push(Step::Literal(value.into()));
        self
    }

    /// Namespace with the default `:` separator.
    pub fn namespace(self, name: impl Into<String>) -> Self {
        self.namespace_sep(name, NAMESPACE_SEPARATOR)
    }

    pub fn namespace_sep(mut self, name: impl Into<String>, separator: impl Into<String>) -> Self {
        self.steps.push(Step::Namespace {
            name: name.into(),
            separator: separator.into(),
        });
        self
    }

    pub fn join<I, S>(mut self, separator: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(Step::Join {
            separator: separator.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn request_param(
        mut self,
        location: ParamLocation,
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        self.steps.push(Step::RequestParam {
            location,
            name: name.into(),
            default: default.into(),
        });
        self
    }

    pub fn claim(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Claim { name: name.into() });
        self
    }

    /// Concatenate all step outputs.
    pub fn build(&self, ctx: &BuildContext<'_>) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&self.eval(step, ctx));
        }
        out
    }

    /// Like [`EntityBuilder::build`], but a request parameter that resolves
    /// to an empty string with an empty default is an error.
    pub fn build_strict(&self, ctx: &BuildContext<'_>) -> Result<String, BuildError> {
        let mut out = String::new();
        for step in &self.steps {
            let value = self.eval(step, ctx);
            if value.is_empty() {
                if let Step::RequestParam { name, default, .. } = step {
                    if default.is_empty() {
                        return Err(BuildError::MissingParameter(name.clone()));
                    }
                }
            }
            out.push_str(&value);
        }
        Ok(out)
    }

    pub fn build_principal(&self, ctx: &BuildContext<'_>) -> Principal {
        Principal::new(self.build(ctx))
    }

    pub fn build_object(&self, ctx: &BuildContext<'_>) -> Object {
        Object::new(self.build(ctx))
    }

    pub fn build_action(&self, ctx: &BuildContext<'_>) -> Action {
        Action::new(self.build(ctx))
    }

    fn eval(&self, step: &Step, ctx: &BuildContext<'_>) -> String {
        match step {
            Step::Literal(value) => value.clone(),
            Step::Namespace { name, separator } => {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{name}{separator}")
                }
            }
            Step::Join { separator, values } => values.join(separator),
            Step::RequestParam {
                location,
                name,
                default,
            } => {
                let value = ctx.request.and_then(|request| match location {
                    ParamLocation::Path => request.path_param(name),
                    ParamLocation::Query => request.query_param(name),
                });

                value.unwrap_or(default.as_str()).to_string()
            }
            Step::Claim { name } => ctx
                .claims
                .and_then(|claims| claims.string_claim(name))
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DEFAULT_JOIN_SEPARATOR;

    fn claims_with_subject(subject: &str) -> Claims {
        Claims {
            subject: Some(subject.to_string()),
            ..Claims::default()
        }
    }

    #[test]
    fn namespace_and_subject_claim() {
        let claims = claims_with_subject("42");
        let ctx = BuildContext::empty().with_claims(&claims);

        let user = EntityBuilder::new().namespace("user").claim("sub").build(&ctx);
        assert_eq!(user, "user:42");
    }

    #[test]
    fn namespace_then_join_has_no_implicit_separators() {
        let user = EntityBuilder::new()
            .namespace("user")
            .join(DEFAULT_JOIN_SEPARATOR, ["bar", "baz"])
            .build(&BuildContext::empty());
        assert_eq!(user, "user:bar/baz");
    }

    #[test]
    fn empty_namespace_emits_nothing() {
        let user = EntityBuilder::new()
            .namespace("")
            .literal("foo")
            .build(&BuildContext::empty());
        assert_eq!(user, "foo");
    }

    #[test]
    fn unresolved_request_param_degrades_to_empty_segment() {
        let request = AuthRequest::new();
        let ctx = BuildContext::empty().with_request(&request);

        let object = EntityBuilder::new()
            .namespace("team")
            .request_param(ParamLocation::Path, "team", "")
            .build(&ctx);
        assert_eq!(object, "team:");
    }

    #[test]
    fn request_param_prefers_the_request_value_over_the_default() {
        let request = AuthRequest::new().with_path_param("team", "acme");
        let ctx = BuildContext::empty().with_request(&request);

        let object = EntityBuilder::new()
            .namespace("team")
            .request_param(ParamLocation::Path, "team", "fallback")
            .build(&ctx);
        assert_eq!(object, "team:acme");
    }

    #[test]
    fn query_params_resolve() {
        let request = AuthRequest::new().with_query_param("document", "doc1");
        let ctx = BuildContext::empty().with_request(&request);

        let object = EntityBuilder::new()
            .namespace("document")
            .request_param(ParamLocation::Query, "document", "")
            .build(&ctx);
        assert_eq!(object, "document:doc1");
    }

    #[test]
    fn build_strict_errors_on_missing_required_param() {
        let request = AuthRequest::new();
        let ctx = BuildContext::empty().with_request(&request);

        let builder = EntityBuilder::new()
            .namespace("team")
            .request_param(ParamLocation::Path, "team", "");

        assert_eq!(
            builder.build_strict(&ctx),
            Err(BuildError::MissingParameter("team".to_string()))
        );
    }

    #[test]
    fn build_strict_accepts_a_non_empty_default() {
        let request = AuthRequest::new();
        let ctx = BuildContext::empty().with_request(&request);

        let builder = EntityBuilder::new()
            .namespace("team")
            .request_param(ParamLocation::Path, "team", "unassigned");

        assert_eq!(builder.build_strict(&ctx).as_deref(), Ok("team:unassigned"));
    }

    #[test]
    fn missing_claim_resolves_to_empty() {
        let action = EntityBuilder::new()
            .namespace("user")
            .claim("sub")
            .build(&BuildContext::empty());
        assert_eq!(action, "user:");
    }
}
