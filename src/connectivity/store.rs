//! Document store boundary
//!
//! The vendor document-store client owns persistence, caching, and auth.
//! This crate only probes it and toggles its network layer, so the boundary
//! is a narrow trait the real client adapter implements and tests fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

/// A document fetched from the store: its path plus raw field payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: String,
    pub fields: Value,
}

impl Document {
    pub fn new(path: impl Into<String>, fields: Value) -> Self {
        Self {
            path: path.into(),
            fields,
        }
    }
}

/// An authenticated session on the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSession {
    pub user_id: String,
}

impl StoreSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Narrow interface to the vendor document-store client.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document by path.
    ///
    /// A missing document is `Ok(None)`, not an error. For connectivity
    /// probing only the round trip matters, not the payload.
    async fn get_document(&self, path: &str) -> StoreResult<Option<Document>>;

    /// Re-enable the store's network layer after an offline period.
    async fn enable_network(&self) -> StoreResult<()>;

    /// Disable the store's network layer, forcing cache-only reads.
    async fn disable_network(&self) -> StoreResult<()>;

    /// The currently authenticated session, if any.
    fn current_session(&self) -> Option<StoreSession>;
}
