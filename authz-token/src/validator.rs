use crate::error::{Result, TokenError};
use crate::keyset::KeyProvider;
use authz_core::{AuthRequest, Claims};
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Claim the scope/permission list is read from by default.
pub const DEFAULT_SCOPE_CLAIM: &str = "scope";

/// `Bearer <token>`, with exactly one ASCII space after the prefix.
const BEARER_PREFIX: &str = "Bearer ";

/// Validator configuration with documented defaults.
///
/// Defaults are merged by constructing via [`ValidatorConfig::new`] and
/// overriding named fields; there is no hidden global validator state.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Primary issuer, matched exactly.
    pub issuer: String,
    /// Additional accepted issuers, tried in order after the primary; the
    /// first exact match wins.
    pub issuer_aliases: Vec<String>,
    /// Audience the token must carry. Empty disables the audience check.
    pub audience: String,
    /// Name of the scope/permission claim. Default `scope`.
    pub scope_claim: String,
    /// Leeway in seconds applied to `exp`/`nbf`/`iat` checks. Default 0.
    pub leeway_secs: u64,
}

impl ValidatorConfig {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            issuer_aliases: Vec::new(),
            audience: audience.into(),
            scope_claim: DEFAULT_SCOPE_CLAIM.to_string(),
            leeway_secs: 0,
        }
    }

    pub fn with_issuer_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issuer_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scope_claim(mut self, claim: impl Into<String>) -> Self {
        self.scope_claim = claim.into();
        self
    }

    pub fn with_leeway_secs(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }
}

/// Shape of the decoded payload before claim normalization.
///
/// `sub` and `aud` stay untyped so shape violations map to their own error
/// kinds instead of a generic decode failure.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<Value>,
    iss: Option<String>,
    aud: Option<Value>,
    exp: Option<i64>,
    nbf: Option<i64>,
    iat: Option<i64>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// Verifies bearer tokens and extracts [`Claims`].
pub struct TokenValidator {
    config: ValidatorConfig,
    keys: Arc<dyn KeyProvider>,
}

impl TokenValidator {
    pub fn new(config: ValidatorConfig, keys: Arc<dyn KeyProvider>) -> Self {
        Self { config, keys }
    }

    /// Validate the bearer token carried by the request.
    ///
    /// Order: header form, signature (key resolved by `kid`), lifetime,
    /// issuer, audience, subject shape, scope-claim shape. The first failing
    /// check decides the error; nothing is retried.
    pub async fn validate(&self, request: &AuthRequest) -> Result<Claims> {
        let raw = bearer_token(request)?;

        let header = decode_header(raw).map_err(|err| TokenError::Invalid(err.to_string()))?;
        let kid = header.kid.ok_or(TokenError::InvalidSignature)?;
        let key = self.keys.key_for(&kid).await?;

        let mut validation = Validation::new(key.algorithm);
        validation.leeway = self.config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // Issuer and audience are checked below; the alias list and the
        // normalized audience shapes are not expressible here.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let decoded =
            decode::<RawClaims>(raw, &key.key, &validation).map_err(map_decode_error)?;
        let raw_claims = decoded.claims;

        // `iat` in the future is rejected; the library only covers `nbf`.
        if let Some(iat) = raw_claims.iat {
            let now = Utc::now().timestamp();
            if iat > now.saturating_add(self.config.leeway_secs as i64) {
                return Err(TokenError::NotYetValid);
            }
        }

        let issuer = raw_claims.iss.clone().ok_or(TokenError::InvalidIssuer)?;
        if !self.issuer_accepted(&issuer) {
            return Err(TokenError::InvalidIssuer);
        }

        let audience = normalize_audience(raw_claims.aud.as_ref())?;
        if !self.config.audience.is_empty()
            && !audience.iter().any(|aud| *aud == self.config.audience)
        {
            return Err(TokenError::InvalidAudience);
        }

        let subject = match raw_claims.sub {
            None => None,
            Some(Value::String(sub)) => Some(sub),
            Some(_) => return Err(TokenError::InvalidSubject),
        };

        let mut extra = raw_claims.extra;
        let scopes = normalize_scopes(extra.remove(&self.config.scope_claim))?;

        debug!(
            subject = subject.as_deref().unwrap_or(""),
            scopes = scopes.len(),
            "bearer token validated"
        );

        Ok(Claims {
            subject,
            issuer: Some(issuer),
            audience,
            expires_at: raw_claims.exp,
            not_before: raw_claims.nbf,
            issued_at: raw_claims.iat,
            scopes,
            extra,
        })
    }

    fn issuer_accepted(&self, issuer: &str) -> bool {
        if issuer == self.config.issuer {
            return true;
        }

        self.config
            .issuer_aliases
            .iter()
            .any(|alias| alias == issuer)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Exactly one ASCII space after the prefix; anything else is malformed.
pub fn bearer_token(request: &AuthRequest) -> Result<&str> {
    let header = request
        .header(&http::header::AUTHORIZATION)
        .ok_or(TokenError::MissingHeader)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(TokenError::MalformedHeader)?;

    if token.is_empty() || token.starts_with(' ') {
        return Err(TokenError::MalformedHeader);
    }

    Ok(token)
}

/// Fail unless every required scope appears in the claims' scope list.
///
/// Membership is set-based: order and duplicates are irrelevant. An empty
/// required list always succeeds.
pub fn has_required_scopes<S: AsRef<str>>(required: &[S], claims: &Claims) -> Result<()> {
    let granted = claims.scope_set();

    for scope in required {
        let scope = scope.as_ref();
        if !granted.contains(scope) {
            return Err(TokenError::InsufficientScope(scope.to_string()));
        }
    }

    Ok(())
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::MissingRequiredClaim(claim) if claim.as_str() == "exp" => TokenError::Expired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
        _ => TokenError::Invalid(err.to_string()),
    }
}

fn normalize_audience(aud: Option<&Value>) -> Result<Vec<String>> {
    match aud {
        None => Ok(Vec::new()),
        Some(Value::String(aud)) => Ok(vec![aud.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(aud) => Ok(aud.clone()),
                _ => Err(TokenError::InvalidAudience),
            })
            .collect(),
        Some(_) => Err(TokenError::InvalidAudience),
    }
}

/// Accepts a space-delimited string or a homogeneous list of strings; any
/// other shape is a claim-type failure.
fn normalize_scopes(value: Option<Value>) -> Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::String(scopes)) => Ok(scopes
            .split(' ')
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(scope) => Ok(scope),
                _ => Err(TokenError::InvalidClaimType),
            })
            .collect(),
        Some(_) => Err(TokenError::InvalidClaimType),
    }
}
