//! Relational checker backends for the authz engine
//!
//! Grants live in Postgres as role memberships; three views flatten
//! `user → role → permission` into rows a decision can count:
//!
//! - `vw_user_permissions (user_id, permission)` — resource-independent RBAC
//! - `vw_user_team_permissions (user_id, team_id, permission)` — team-scoped
//! - `vw_api_key_team_permissions (key_id, team_id, permission)` — API keys
//!
//! A permission is granted when at least one row matches the decision's keys.
//! The views are computed by the store; the checkers only count rows, once
//! per decision, with no caching and no retries.
//!
//! Creating the tables and views is a setup-time operation
//! ([`run_migrations`]), never part of a decision.

pub mod api_key;
pub mod migrate;
pub mod models;
pub mod rbac;
pub mod tbac;

pub use api_key::ApiKeyChecker;
pub use migrate::run_migrations;
pub use models::{
    new_api_key, ApiKey, ApiKeyRole, Permission, Role, RolePermission, Team, User, UserRole,
};
pub use rbac::RbacChecker;
pub use tbac::TbacChecker;
