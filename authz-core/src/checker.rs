use crate::entity::{Action, Object, Principal};
use crate::error::CheckError;
use async_trait::async_trait;

/// The decision contract every backend implements.
///
/// `Ok(true)` grants, `Ok(false)` is a definitive deny, and `Err` means the
/// decision could not be made. A checker is a pure function of its three
/// string inputs plus externally-queried state: no internal caching of
/// verdicts, one query per decision, no retries. Cancellation is inherited
/// from the caller dropping the future.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn allowed(
        &self,
        principal: &Principal,
        object: &Object,
        action: &Action,
    ) -> Result<bool, CheckError>;
}

/// The default checker: denies everything, including the sentinel triple.
///
/// Safe to leave in place anywhere a real backend has not been configured —
/// nothing is ever granted by omission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChecker;

impl NoopChecker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Checker for NoopChecker {
    async fn allowed(
        &self,
        _principal: &Principal,
        _object: &Object,
        _action: &Action,
    ) -> Result<bool, CheckError> {
        Ok(false)
    }
}

/// Test double with a fixed verdict.
#[derive(Debug, Clone, Copy)]
pub struct FakeChecker {
    allowed: bool,
}

impl FakeChecker {
    pub fn new(allowed: bool) -> Self {
        Self { allowed }
    }
}

#[async_trait]
impl Checker for FakeChecker {
    async fn allowed(
        &self,
        _principal: &Principal,
        _object: &Object,
        _action: &Action,
    ) -> Result<bool, CheckError> {
        Ok(self.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_denies_everything() {
        let checker = NoopChecker::new();

        let allowed = checker
            .allowed(
                &Principal::new("principal"),
                &Object::new("object"),
                &Action::new("action"),
            )
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn noop_denies_the_sentinel_triple() {
        let checker = NoopChecker::new();

        let allowed = checker
            .allowed(&Principal::none(), &Object::none(), &Action::none())
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn fake_returns_its_configured_verdict() {
        for expected in [true, false] {
            let checker = FakeChecker::new(expected);

            let allowed = checker
                .allowed(
                    &Principal::new("principal"),
                    &Object::new("object"),
                    &Action::new("action"),
                )
                .await
                .unwrap();
            assert_eq!(allowed, expected);
        }
    }
}
