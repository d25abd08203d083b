//! One-shot schema setup for the relational backends.
//!
//! Idempotent: every statement is `IF NOT EXISTS` / `OR REPLACE`, so rerunning
//! against an already-provisioned database is a no-op. Decisions never touch
//! this module.

use authz_core::CheckError;
use sqlx::PgPool;
use tracing::info;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS permissions (
        id BIGSERIAL PRIMARY KEY,
        scope TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS api_keys (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        key TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_permissions (
        role_id UUID NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
        permission_id BIGINT NOT NULL REFERENCES permissions (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (role_id, permission_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_roles (
        id BIGSERIAL PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        team_id UUID REFERENCES teams (id) ON DELETE CASCADE,
        role_id UUID NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS api_key_roles (
        id BIGSERIAL PRIMARY KEY,
        key_id UUID NOT NULL REFERENCES api_keys (id) ON DELETE CASCADE,
        team_id UUID REFERENCES teams (id) ON DELETE CASCADE,
        role_id UUID NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE OR REPLACE VIEW vw_user_permissions AS
    SELECT a.user_id, c.scope AS permission
    FROM user_roles AS a
    LEFT JOIN role_permissions AS b ON a.role_id = b.role_id
    LEFT JOIN permissions AS c ON b.permission_id = c.id
    "#,
    r#"
    CREATE OR REPLACE VIEW vw_user_team_permissions AS
    SELECT a.user_id, a.team_id, c.scope AS permission
    FROM user_roles AS a
    LEFT JOIN role_permissions AS b ON a.role_id = b.role_id
    LEFT JOIN permissions AS c ON b.permission_id = c.id
    "#,
    r#"
    CREATE OR REPLACE VIEW vw_api_key_team_permissions AS
    SELECT a.key_id, a.team_id, c.scope AS permission
    FROM api_key_roles AS a
    LEFT JOIN role_permissions AS b ON a.role_id = b.role_id
    LEFT JOIN permissions AS c ON b.permission_id = c.id
    "#,
];

/// Create the grant tables and permission views.
pub async fn run_migrations(pool: &PgPool) -> Result<(), CheckError> {
    for statement in MIGRATIONS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|err| CheckError::Storage(format!("migration failed: {err}")))?;
    }

    info!("relational authz schema is up to date");
    Ok(())
}
