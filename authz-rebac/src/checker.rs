use crate::client::RelationshipClient;
use async_trait::async_trait;
use authz_core::{Action, CheckError, Checker, Object, Principal};
use std::sync::Arc;
use tracing::debug;

/// Checker that delegates to a relationship store's check call.
///
/// The principal is the tuple's user, the action is the relation, the object
/// is the object — all sent verbatim with their namespaces. The store's
/// verdict is passed through unchanged; a transport or client failure
/// surfaces as a checker error, distinguishable from a deny.
pub struct RelationshipChecker {
    client: Arc<dyn RelationshipClient>,
}

impl RelationshipChecker {
    pub fn new(client: Arc<dyn RelationshipClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Checker for RelationshipChecker {
    async fn allowed(
        &self,
        principal: &Principal,
        object: &Object,
        action: &Action,
    ) -> Result<bool, CheckError> {
        debug!(principal = %principal, object = %object, action = %action, "relationship check");

        self.client
            .check(principal.as_str(), action.as_str(), object.as_str())
            .await
    }
}
