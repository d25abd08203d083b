use async_trait::async_trait;
use authz_core::CheckError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Narrow view of a relationship store: a single remote check call.
///
/// The three strings are sent exactly as resolved — namespaces included —
/// and the store's verdict comes back unchanged.
#[async_trait]
pub trait RelationshipClient: Send + Sync {
    async fn check(&self, user: &str, relation: &str, object: &str) -> Result<bool, CheckError>;
}

#[derive(Serialize)]
struct TupleKey<'a> {
    user: &'a str,
    relation: &'a str,
    object: &'a str,
}

#[derive(Serialize)]
struct CheckRequestBody<'a> {
    tuple_key: TupleKey<'a>,
}

#[derive(Deserialize)]
struct CheckResponseBody {
    #[serde(default)]
    allowed: bool,
}

/// HTTP client for a tuple store exposing `POST /stores/{store_id}/check`.
#[derive(Debug, Clone)]
pub struct HttpRelationshipClient {
    base_url: String,
    store_id: String,
    http: reqwest::Client,
}

impl HttpRelationshipClient {
    pub fn new(base_url: impl Into<String>, store_id: impl Into<String>) -> Self {
        Self::with_client(base_url, store_id, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        store_id: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            store_id: store_id.into(),
            http,
        }
    }

    fn check_url(&self) -> String {
        format!(
            "{}/stores/{}/check",
            self.base_url.trim_end_matches('/'),
            self.store_id
        )
    }
}

#[async_trait]
impl RelationshipClient for HttpRelationshipClient {
    async fn check(&self, user: &str, relation: &str, object: &str) -> Result<bool, CheckError> {
        let body = CheckRequestBody {
            tuple_key: TupleKey {
                user,
                relation,
                object,
            },
        };

        let response = self
            .http
            .post(self.check_url())
            .json(&body)
            .send()
            .await
            .map_err(|err| CheckError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Transport(format!(
                "relationship store returned status {status}"
            )));
        }

        let verdict: CheckResponseBody = response
            .json()
            .await
            .map_err(|err| CheckError::Transport(err.to_string()))?;

        debug!(user, relation, object, allowed = verdict.allowed, "tuple check");
        Ok(verdict.allowed)
    }
}

/// In-memory tuple set for tests and development.
#[derive(Debug, Default)]
pub struct InMemoryRelationshipClient {
    tuples: DashMap<(String, String, String), ()>,
}

impl InMemoryRelationshipClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user` having `relation` on `object`.
    pub fn write(&self, user: &str, relation: &str, object: &str) {
        self.tuples.insert(
            (user.to_string(), relation.to_string(), object.to_string()),
            (),
        );
    }

    pub fn delete(&self, user: &str, relation: &str, object: &str) {
        self.tuples
            .remove(&(user.to_string(), relation.to_string(), object.to_string()));
    }
}

#[async_trait]
impl RelationshipClient for InMemoryRelationshipClient {
    async fn check(&self, user: &str, relation: &str, object: &str) -> Result<bool, CheckError> {
        Ok(self.tuples.contains_key(&(
            user.to_string(),
            relation.to_string(),
            object.to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_tuples_round_trip() {
        let client = InMemoryRelationshipClient::new();

        assert!(!client.check("user:alice", "editor", "document:doc1").await.unwrap());

        client.write("user:alice", "editor", "document:doc1");
        assert!(client.check("user:alice", "editor", "document:doc1").await.unwrap());

        client.delete("user:alice", "editor", "document:doc1");
        assert!(!client.check("user:alice", "editor", "document:doc1").await.unwrap());
    }

    #[test]
    fn check_url_normalizes_trailing_slashes() {
        let client = HttpRelationshipClient::new("http://localhost:8080/", "store1");
        assert_eq!(client.check_url(), "http://localhost:8080/stores/store1/check");
    }
}
