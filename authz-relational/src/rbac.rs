use authz_core::{Action, CheckError, Checker, Object, Principal};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Resource-independent role-based checker.
///
/// Grants when the principal holds any role that carries the permission,
/// regardless of the object. Keys on the bare identifier after the
/// principal's namespace (`user:42` → `42`).
pub struct RbacChecker {
    pool: PgPool,
}

impl RbacChecker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Checker for RbacChecker {
    async fn allowed(
        &self,
        principal: &Principal,
        _object: &Object,
        action: &Action,
    ) -> Result<bool, CheckError> {
        debug!(principal = %principal, action = %action, "rbac check");

        let matches: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM vw_user_permissions WHERE user_id = $1 AND permission = $2",
        )
        .bind(principal.id())
        .bind(action.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| CheckError::Storage(err.to_string()))?;

        Ok(matches > 0)
    }
}
