use crate::error::ResolveError;
use authz_core::{Action, AuthRequest, BuildContext, Claims, EntityBuilder, Object, Principal};

/// What a resolver may read: the request view and the validated claims.
///
/// Resolvers are side-effect-free; each call depends only on these two
/// inputs.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub request: &'a AuthRequest,
    pub claims: &'a Claims,
}

impl<'a> ResolveContext<'a> {
    pub fn new(request: &'a AuthRequest, claims: &'a Claims) -> Self {
        Self { request, claims }
    }

    pub fn build_context(&self) -> BuildContext<'a> {
        BuildContext::new(self.request, self.claims)
    }
}

pub trait PrincipalResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Principal, ResolveError>;
}

pub trait ObjectResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Object, ResolveError>;
}

pub trait ActionResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Action, ResolveError>;
}

/// Default principal resolver: the token subject under a namespace,
/// `user:<sub>`. A token without a subject cannot act as anyone and is a
/// resolution failure.
#[derive(Debug, Clone)]
pub struct ClaimsPrincipalResolver {
    namespace: String,
}

impl ClaimsPrincipalResolver {
    pub fn new() -> Self {
        Self::with_namespace("user")
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl Default for ClaimsPrincipalResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PrincipalResolver for ClaimsPrincipalResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Principal, ResolveError> {
        let subject = ctx
            .claims
            .subject
            .as_deref()
            .filter(|subject| !subject.is_empty())
            .ok_or(ResolveError::MissingSubject)?;

        if self.namespace.is_empty() {
            return Ok(Principal::new(subject));
        }

        Ok(Principal::new(format!("{}:{}", self.namespace, subject)))
    }
}

/// Object resolver driven by an [`EntityBuilder`].
///
/// Lenient by default: an unresolved component degrades to an empty segment.
/// [`BuilderObjectResolver::strict`] turns a missing required parameter into
/// a resolution error instead.
#[derive(Debug, Clone)]
pub struct BuilderObjectResolver {
    builder: EntityBuilder,
    strict: bool,
}

impl BuilderObjectResolver {
    pub fn new(builder: EntityBuilder) -> Self {
        Self {
            builder,
            strict: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl ObjectResolver for BuilderObjectResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Object, ResolveError> {
        let build_ctx = ctx.build_context();

        if self.strict {
            let value = self.builder.build_strict(&build_ctx)?;
            return Ok(Object::new(value));
        }

        Ok(self.builder.build_object(&build_ctx))
    }
}

/// Action resolver over per-operation static configuration.
#[derive(Debug, Clone)]
pub struct BuilderActionResolver {
    builder: EntityBuilder,
}

impl BuilderActionResolver {
    pub fn new(builder: EntityBuilder) -> Self {
        Self { builder }
    }
}

impl ActionResolver for BuilderActionResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Action, ResolveError> {
        Ok(self.builder.build_action(&ctx.build_context()))
    }
}

/// Sentinel resolvers. Paired with the Noop checker they guarantee a deny;
/// no backend grants the empty triple.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrincipalResolver;

impl PrincipalResolver for NoopPrincipalResolver {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Principal, ResolveError> {
        Ok(Principal::none())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObjectResolver;

impl ObjectResolver for NoopObjectResolver {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Object, ResolveError> {
        Ok(Object::none())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActionResolver;

impl ActionResolver for NoopActionResolver {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Action, ResolveError> {
        Ok(Action::none())
    }
}
