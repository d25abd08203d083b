use thiserror::Error;

/// Credential failures.
///
/// All of these surface as an authentication failure, distinct from an
/// authorization failure; none of them is ever retried internally.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("authorization header is missing")]
    MissingHeader,

    #[error("authorization header is malformed")]
    MalformedHeader,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token issuer is invalid")]
    InvalidIssuer,

    #[error("token audience is invalid")]
    InvalidAudience,

    #[error("token subject is invalid")]
    InvalidSubject,

    #[error("scope claim has an unexpected type")]
    InvalidClaimType,

    #[error("required scope is missing: {0}")]
    InsufficientScope(String),

    #[error("token is invalid: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, TokenError>;
