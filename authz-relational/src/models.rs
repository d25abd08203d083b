use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A role a user or an API key can hold.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    #[validate(length(min = 1, max = 254))]
    pub name: String,
    #[validate(length(max = 254))]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A team: the resource scope for team-based grants.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    #[validate(length(min = 4, max = 254))]
    pub name: String,
    /// Unique identifier used in request paths; lowercase alphanumeric.
    #[validate(length(min = 4, max = 254), custom(function = validate_slug))]
    pub slug: String,
    #[validate(length(max = 254))]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row. The id is the opaque subject identifier carried by the
/// principal, not a locally-generated key.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct User {
    #[validate(length(min = 1, max = 254))]
    pub id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A named permission, matched against the decision's action.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Permission {
    pub id: i64,
    /// Unique identifier of the permission; lowercase alphanumeric.
    #[validate(length(min = 4, max = 254), custom(function = validate_slug))]
    pub scope: String,
    #[validate(length(max = 254))]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An API key that can hold roles like a user does.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct ApiKey {
    pub id: Uuid,
    #[validate(length(min = 4, max = 254))]
    pub key: String,
    #[validate(length(max = 254))]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Role membership of a user, optionally scoped to a team.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRole {
    pub user_id: String,
    pub team_id: Option<Uuid>,
    pub role_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Permission granted by a role.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Role membership of an API key, optionally scoped to a team.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApiKeyRole {
    pub key_id: Uuid,
    pub team_id: Option<Uuid>,
    pub role_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Mint a new API key identifier (time-ordered UUIDv7).
pub fn new_api_key() -> String {
    Uuid::now_v7().to_string()
}

fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let well_formed = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(slug: &str) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "team".to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_team_passes() {
        assert!(team("acme").validate().is_ok());
    }

    #[test]
    fn slug_too_short_fails() {
        assert!(team("ac").validate().is_err());
    }

    #[test]
    fn slug_too_long_fails() {
        assert!(team(&"a".repeat(255)).validate().is_err());
    }

    #[test]
    fn slug_must_be_lowercase() {
        assert!(team("Acme").validate().is_err());
    }

    #[test]
    fn slug_must_be_alphanumeric() {
        assert!(team("acme!").validate().is_err());
        assert!(team("ac me").validate().is_err());
    }

    #[test]
    fn new_api_key_is_a_uuid() {
        let key = new_api_key();
        assert!(Uuid::parse_str(&key).is_ok());
    }
}
