use authz_core::{Action, CheckError, Checker, Object, Principal};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Team-scoped checker keyed on an API-key identifier instead of a user.
///
/// The principal's bare identifier must be the key's UUID. An identifier that
/// is not a UUID cannot match any key row and is a deny, not an error.
pub struct ApiKeyChecker {
    pool: PgPool,
}

impl ApiKeyChecker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Checker for ApiKeyChecker {
    async fn allowed(
        &self,
        principal: &Principal,
        object: &Object,
        action: &Action,
    ) -> Result<bool, CheckError> {
        debug!(principal = %principal, object = %object, action = %action, "api key check");

        let Ok(key_id) = Uuid::parse_str(principal.id()) else {
            return Ok(false);
        };

        let matches: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM vw_api_key_team_permissions \
             WHERE key_id = $1 \
               AND team_id = (SELECT id FROM teams WHERE slug = $2) \
               AND permission = $3",
        )
        .bind(key_id)
        .bind(object.id())
        .bind(action.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| CheckError::Storage(err.to_string()))?;

        Ok(matches > 0)
    }
}
