//! End-to-end decision pipeline tests, driven by the fake signer and the
//! in-memory relationship client.

use authz_core::{Action, AuthRequest, CheckError, Checker, FakeChecker, NoopChecker, Object, Principal};
use authz_gateway::{
    AuthzMetadata, ClaimsPrincipalResolver, Decision, DecisionChain, DecisionError,
    DecisionPipeline, DecisionStatus, MissingMetadataPolicy,
};
use authz_rebac::{InMemoryRelationshipClient, RelationshipChecker};
use authz_token::{FakeSigner, TokenError};
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn request_with_token(signer: &FakeSigner, subject: &str, scopes: &[&str]) -> AuthRequest {
    let token = signer.sign(&signer.standard_claims(subject, scopes)).unwrap();
    AuthRequest::new().with_header(AUTHORIZATION, &format!("Bearer {token}"))
}

fn metadata() -> AuthzMetadata {
    serde_json::from_value(serde_json::json!({
        "user": { "namespace": "user" },
        "object": {
            "namespace": "team",
            "components": [ { "in": "path", "name": "team" } ]
        },
        "relation": { "name": "read" }
    }))
    .unwrap()
}

/// Counts invocations so tests can assert the checker was never consulted.
struct CountingChecker {
    calls: AtomicUsize,
    allowed: bool,
}

impl CountingChecker {
    fn new(allowed: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            allowed,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for CountingChecker {
    async fn allowed(
        &self,
        _principal: &Principal,
        _object: &Object,
        _action: &Action,
    ) -> Result<bool, CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.allowed)
    }
}

#[tokio::test]
async fn valid_token_with_matching_grant_is_allowed() {
    let signer = FakeSigner::new();

    let tuples = Arc::new(InMemoryRelationshipClient::new());
    tuples.write("user:42", "read", "team:acme");

    let metadata = metadata();
    let pipeline = DecisionPipeline::from_metadata(
        signer.validator(),
        Arc::new(RelationshipChecker::new(tuples)),
        Some(&metadata),
        MissingMetadataPolicy::default(),
    )
    .with_required_scopes(["read"]);

    let request = request_with_token(&signer, "42", &["read"]).with_path_param("team", "acme");

    let decision = pipeline.authorize(&request).await.unwrap();
    let context = decision.context().expect("grant must carry the triple");
    assert_eq!(context.principal.as_str(), "user:42");
    assert_eq!(context.object.as_str(), "team:acme");
    assert_eq!(context.action.as_str(), "read");
}

#[tokio::test]
async fn missing_required_scope_never_reaches_the_checker() {
    let signer = FakeSigner::new();
    let checker = Arc::new(CountingChecker::new(true));

    let pipeline = DecisionPipeline::new(signer.validator())
        .with_checker(checker.clone())
        .with_principal_resolver(Arc::new(ClaimsPrincipalResolver::new()))
        .with_required_scopes(["admin"]);

    let request = request_with_token(&signer, "42", &["read"]);

    let err = pipeline.authorize(&request).await.unwrap_err();
    assert!(matches!(
        err,
        DecisionError::Unauthenticated(TokenError::InsufficientScope(_))
    ));
    assert_eq!(err.status(), DecisionStatus::Unauthenticated);
    assert_eq!(checker.calls(), 0, "the checker must not be consulted");
}

#[tokio::test]
async fn missing_credentials_are_unauthenticated() {
    let signer = FakeSigner::new();
    let pipeline =
        DecisionPipeline::new(signer.validator()).with_checker(Arc::new(FakeChecker::new(true)));

    let err = pipeline.authorize(&AuthRequest::new()).await.unwrap_err();
    assert!(matches!(
        err,
        DecisionError::Unauthenticated(TokenError::MissingHeader)
    ));
}

#[tokio::test]
async fn a_definitive_deny_is_a_verdict_not_an_error() {
    let signer = FakeSigner::new();

    let pipeline = DecisionPipeline::new(signer.validator())
        .with_checker(Arc::new(FakeChecker::new(false)))
        .with_principal_resolver(Arc::new(ClaimsPrincipalResolver::new()));

    let request = request_with_token(&signer, "42", &[]);

    let decision = pipeline.authorize(&request).await.unwrap();
    assert_eq!(decision, Decision::Denied);
    assert!(!decision.is_allowed());
    assert!(decision.context().is_none());
}

#[tokio::test]
async fn checker_failure_is_an_internal_error_distinct_from_deny() {
    struct BrokenChecker;

    #[async_trait]
    impl Checker for BrokenChecker {
        async fn allowed(
            &self,
            _: &Principal,
            _: &Object,
            _: &Action,
        ) -> Result<bool, CheckError> {
            Err(CheckError::Transport("connection refused".to_string()))
        }
    }

    let signer = FakeSigner::new();
    let pipeline = DecisionPipeline::new(signer.validator()).with_checker(Arc::new(BrokenChecker));

    let request = request_with_token(&signer, "42", &[]);

    let err = pipeline.authorize(&request).await.unwrap_err();
    assert_eq!(err.status(), DecisionStatus::InternalError);
}

#[tokio::test]
async fn noop_pipeline_denies_even_the_sentinel_triple() {
    let signer = FakeSigner::new();
    let pipeline = DecisionPipeline::new(signer.validator());

    let request = request_with_token(&signer, "42", &[]);

    let decision = pipeline.authorize(&request).await.unwrap();
    assert_eq!(decision, Decision::Denied);
}

#[tokio::test]
async fn bypass_skips_authentication_entirely() {
    let signer = FakeSigner::new();
    let pipeline = DecisionPipeline::new(signer.validator())
        .with_checker(Arc::new(NoopChecker::new()))
        .with_bypass(|request| request.path_param("team").is_none());

    // No credentials at all; the predicate matches and the request passes.
    let decision = pipeline.authorize(&AuthRequest::new()).await.unwrap();
    assert_eq!(decision, Decision::Bypassed);
    assert!(decision.context().is_none());

    // The predicate does not match; authentication runs and fails.
    let request = AuthRequest::new().with_path_param("team", "acme");
    let err = pipeline.authorize(&request).await.unwrap_err();
    assert_eq!(err.status(), DecisionStatus::Unauthenticated);
}

#[tokio::test]
async fn operations_without_metadata_default_to_deny() {
    let signer = FakeSigner::new();

    let pipeline = DecisionPipeline::from_metadata(
        signer.validator(),
        Arc::new(FakeChecker::new(true)),
        None,
        MissingMetadataPolicy::Deny,
    );

    let request = request_with_token(&signer, "42", &[]);
    let decision = pipeline.authorize(&request).await.unwrap();
    assert_eq!(decision, Decision::Denied, "absent metadata must not grant");
}

#[tokio::test]
async fn operations_without_metadata_can_be_marked_public() {
    let signer = FakeSigner::new();

    let pipeline = DecisionPipeline::from_metadata(
        signer.validator(),
        Arc::new(FakeChecker::new(false)),
        None,
        MissingMetadataPolicy::Bypass,
    );

    let decision = pipeline.authorize(&AuthRequest::new()).await.unwrap();
    assert_eq!(decision, Decision::Bypassed);
}

#[tokio::test]
async fn chain_requires_every_stage_to_pass() {
    let signer = FakeSigner::new();

    let allowing = |signer: &FakeSigner| {
        Arc::new(
            DecisionPipeline::new(signer.validator())
                .with_checker(Arc::new(FakeChecker::new(true)))
                .with_principal_resolver(Arc::new(ClaimsPrincipalResolver::new())),
        )
    };

    let denying = Arc::new(
        DecisionPipeline::new(signer.validator())
            .with_checker(Arc::new(FakeChecker::new(false)))
            .with_principal_resolver(Arc::new(ClaimsPrincipalResolver::new())),
    );

    let request = request_with_token(&signer, "42", &[]);

    let passing_chain = DecisionChain::new()
        .with_stage(allowing(&signer))
        .with_stage(allowing(&signer));
    let decision = passing_chain.authorize(&request).await.unwrap();
    assert!(decision.is_allowed());
    assert_eq!(decision.context().unwrap().principal.as_str(), "user:42");

    let short_circuited = DecisionChain::new()
        .with_stage(allowing(&signer))
        .with_stage(denying)
        .with_stage(allowing(&signer));
    let decision = short_circuited.authorize(&request).await.unwrap();
    assert_eq!(decision, Decision::Denied);
}

#[tokio::test]
async fn chain_aborts_on_the_first_error() {
    let signer = FakeSigner::new();
    let checker = Arc::new(CountingChecker::new(true));

    let scoped = Arc::new(
        DecisionPipeline::new(signer.validator())
            .with_checker(Arc::new(FakeChecker::new(true)))
            .with_required_scopes(["admin"]),
    );
    let counting = Arc::new(
        DecisionPipeline::new(signer.validator()).with_checker(checker.clone() as Arc<dyn Checker>),
    );

    let chain = DecisionChain::new().with_stage(scoped).with_stage(counting);
    let request = request_with_token(&signer, "42", &["read"]);

    let err = chain.authorize(&request).await.unwrap_err();
    assert_eq!(err.status(), DecisionStatus::Unauthenticated);
    assert_eq!(checker.calls(), 0, "later stages must not run after an error");
}

#[tokio::test]
async fn empty_chain_denies() {
    let chain = DecisionChain::new();
    let decision = chain.authorize(&AuthRequest::new()).await.unwrap();
    assert_eq!(decision, Decision::Denied);
}
