use authz_core::{BuildError, CheckError};
use authz_token::TokenError;
use thiserror::Error;

/// A resolver could not produce an entity from the request.
///
/// Surfaced as a client-input failure, distinct from both authentication
/// failures and checker errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("token has no subject to resolve a principal from")]
    MissingSubject,

    #[error("required request parameter is missing: {0}")]
    MissingParameter(String),
}

impl From<BuildError> for ResolveError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::MissingParameter(name) => ResolveError::MissingParameter(name),
        }
    }
}

/// Abstract outward status of a failed or denied decision.
///
/// The external HTTP layer owns the mapping to transport codes; the pipeline
/// only guarantees the four classes stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStatus {
    /// Missing or invalid credential, including insufficient scopes.
    Unauthenticated,
    /// Definitive deny.
    Forbidden,
    /// The decision could not be made.
    InternalError,
    /// Malformed authorization metadata or unresolvable client input.
    BadRequest,
}

/// A pipeline stage failed before a verdict was reached.
///
/// A definitive deny is not an error; it is reported as
/// [`crate::Decision::Denied`].
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] TokenError),

    #[error("bad request: {0}")]
    BadRequest(#[from] ResolveError),

    #[error("internal error: {0}")]
    Internal(#[from] CheckError),
}

impl DecisionError {
    pub fn status(&self) -> DecisionStatus {
        match self {
            DecisionError::Unauthenticated(_) => DecisionStatus::Unauthenticated,
            DecisionError::BadRequest(_) => DecisionStatus::BadRequest,
            DecisionError::Internal(_) => DecisionStatus::InternalError,
        }
    }
}
