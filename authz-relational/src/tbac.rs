use authz_core::{Action, CheckError, Checker, Object, Principal};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Team-scoped role-based checker.
///
/// Same join as [`crate::RbacChecker`], additionally scoped by the team the
/// object resolves to: the object's bare identifier is a team slug, mapped to
/// the internal team id by a subselect. A slug that matches no team makes the
/// subselect empty and the count zero — a deny, never an error.
pub struct TbacChecker {
    pool: PgPool,
}

impl TbacChecker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Checker for TbacChecker {
    async fn allowed(
        &self,
        principal: &Principal,
        object: &Object,
        action: &Action,
    ) -> Result<bool, CheckError> {
        debug!(principal = %principal, object = %object, action = %action, "tbac check");

        let matches: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM vw_user_team_permissions \
             WHERE user_id = $1 \
               AND team_id = (SELECT id FROM teams WHERE slug = $2) \
               AND permission = $3",
        )
        .bind(principal.id())
        .bind(object.id())
        .bind(action.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| CheckError::Storage(err.to_string()))?;

        Ok(matches > 0)
    }
}
