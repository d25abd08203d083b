use crate::error::DecisionError;
use crate::metadata::{AuthzMetadata, MissingMetadataPolicy};
use crate::resolve::{
    ActionResolver, NoopActionResolver, NoopObjectResolver, NoopPrincipalResolver, ObjectResolver,
    PrincipalResolver, ResolveContext,
};
use authz_core::{AuthRequest, AuthzContext, Checker, NoopChecker};
use authz_token::{has_required_scopes, TokenValidator};
use std::sync::Arc;
use tracing::debug;

/// Evaluated before authentication; `true` short-circuits the pipeline.
pub type BypassPredicate = dyn Fn(&AuthRequest) -> bool + Send + Sync;

/// Terminal outcome of a pipeline run that reached a verdict.
///
/// A deny is a valid result, not an error; stage failures are
/// [`DecisionError`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The checker granted; the resolved triple is handed to the caller for
    /// request-scoped use.
    Allowed(AuthzContext),
    /// The checker definitively denied.
    Denied,
    /// The bypass predicate matched; no authentication or authorization ran
    /// and no identity was established.
    Bypassed,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_) | Decision::Bypassed)
    }

    /// The resolved triple, when one was established.
    pub fn context(&self) -> Option<&AuthzContext> {
        match self {
            Decision::Allowed(ctx) => Some(ctx),
            Decision::Denied | Decision::Bypassed => None,
        }
    }
}

/// The decision pipeline.
///
/// Stages run in a fixed order, each terminal on failure:
///
/// 1. bypass predicate (optional) — `true` ends the run as
///    [`Decision::Bypassed`];
/// 2. token validation and scope sufficiency — failure is an authentication
///    error and the checker is never consulted;
/// 3. entity resolution, in the order object, action, principal — all three
///    must resolve before the check;
/// 4. the configured checker — an error is an infrastructure failure,
///    `false` is [`Decision::Denied`], `true` is [`Decision::Allowed`] with
///    the triple.
///
/// Every collaborator is injected at construction; instances hold no mutable
/// state and are safe to share across request tasks.
pub struct DecisionPipeline {
    validator: TokenValidator,
    principal: Arc<dyn PrincipalResolver>,
    object: Arc<dyn ObjectResolver>,
    action: Arc<dyn ActionResolver>,
    checker: Arc<dyn Checker>,
    required_scopes: Vec<String>,
    bypass: Option<Box<BypassPredicate>>,
}

impl DecisionPipeline {
    /// A pipeline that authenticates and then denies everything: sentinel
    /// resolvers feeding the Noop checker. Configure resolvers and a real
    /// checker to grant anything.
    pub fn new(validator: TokenValidator) -> Self {
        Self {
            validator,
            principal: Arc::new(NoopPrincipalResolver),
            object: Arc::new(NoopObjectResolver),
            action: Arc::new(NoopActionResolver),
            checker: Arc::new(NoopChecker),
            required_scopes: Vec::new(),
            bypass: None,
        }
    }

    /// A pipeline wired from per-operation metadata.
    ///
    /// Absent metadata follows the policy: deny routes through the Noop
    /// checker, bypass marks the operation public.
    pub fn from_metadata(
        validator: TokenValidator,
        checker: Arc<dyn Checker>,
        metadata: Option<&AuthzMetadata>,
        policy: MissingMetadataPolicy,
    ) -> Self {
        match metadata {
            Some(metadata) => Self::new(validator)
                .with_checker(checker)
                .with_principal_resolver(Arc::new(metadata.principal_resolver()))
                .with_object_resolver(Arc::new(metadata.object_resolver()))
                .with_action_resolver(Arc::new(metadata.action_resolver())),
            None => match policy {
                MissingMetadataPolicy::Deny => Self::new(validator),
                MissingMetadataPolicy::Bypass => Self::new(validator).with_bypass(|_| true),
            },
        }
    }

    pub fn with_checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_principal_resolver(mut self, resolver: Arc<dyn PrincipalResolver>) -> Self {
        self.principal = resolver;
        self
    }

    pub fn with_object_resolver(mut self, resolver: Arc<dyn ObjectResolver>) -> Self {
        self.object = resolver;
        self
    }

    pub fn with_action_resolver(mut self, resolver: Arc<dyn ActionResolver>) -> Self {
        self.action = resolver;
        self
    }

    /// Scopes the token must carry before resolution starts.
    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bypass<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&AuthRequest) -> bool + Send + Sync + 'static,
    {
        self.bypass = Some(Box::new(predicate));
        self
    }

    /// Run the pipeline against one request.
    pub async fn authorize(&self, request: &AuthRequest) -> Result<Decision, DecisionError> {
        if let Some(bypass) = &self.bypass {
            if bypass(request) {
                debug!("bypass predicate matched, skipping authentication");
                return Ok(Decision::Bypassed);
            }
        }

        // Unauthenticated -> Authenticated
        let claims = self.validator.validate(request).await?;
        has_required_scopes(&self.required_scopes, &claims)?;

        // Authenticated -> Resolved. Fixed order; all three must resolve.
        let ctx = ResolveContext::new(request, &claims);
        let object = self.object.resolve(&ctx)?;
        let action = self.action.resolve(&ctx)?;
        let principal = self.principal.resolve(&ctx)?;

        debug!(principal = %principal, object = %object, action = %action, "triple resolved");

        // Resolved -> Decided
        let allowed = self.checker.allowed(&principal, &object, &action).await?;
        if !allowed {
            debug!(principal = %principal, "denied");
            return Ok(Decision::Denied);
        }

        debug!(principal = %principal, "allowed");
        Ok(Decision::Allowed(AuthzContext::new(principal, object, action)))
    }
}

/// Ordered pipelines combined with short-circuit AND semantics.
///
/// The first stage to fail decides the error; a deny from any stage is the
/// final verdict; all stages must pass. The last stage to establish an
/// identity provides the resulting context. An empty chain denies.
#[derive(Default)]
pub struct DecisionChain {
    stages: Vec<Arc<DecisionPipeline>>,
}

impl DecisionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: Arc<DecisionPipeline>) -> Self {
        self.stages.push(stage);
        self
    }

    pub async fn authorize(&self, request: &AuthRequest) -> Result<Decision, DecisionError> {
        let mut verdict = Decision::Denied;

        for stage in &self.stages {
            match stage.authorize(request).await? {
                Decision::Denied => return Ok(Decision::Denied),
                Decision::Allowed(ctx) => verdict = Decision::Allowed(ctx),
                Decision::Bypassed => {
                    if !matches!(verdict, Decision::Allowed(_)) {
                        verdict = Decision::Bypassed;
                    }
                }
            }
        }

        if self.stages.is_empty() {
            debug!("empty decision chain denies by default");
        }

        Ok(verdict)
    }
}
