//! Lazily initialized handle to the shared document-store instance
//!
//! The embedding application needs exactly one store client per process,
//! but several call sites race to trigger initialization at startup. The
//! handle makes that race harmless: the first initializer wins and every
//! later attempt receives the existing instance instead of an error.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::connectivity::store::DocumentStore;
use crate::error::StoreResult;

/// Process-wide handle to the document-store client.
///
/// Handles are plain values rather than globals so tests can construct an
/// isolated one per case. Production code creates a single handle and
/// shares it.
#[derive(Default)]
pub struct StoreHandle {
    cell: OnceCell<Arc<dyn DocumentStore>>,
}

impl StoreHandle {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Initialize the store, or return the already-initialized instance.
    ///
    /// The factory runs at most once across all concurrent callers; losers
    /// of the race wait for the winner and share its instance. A factory
    /// failure leaves the handle empty so a later attempt can retry.
    pub async fn get_or_init<F, Fut>(&self, factory: F) -> StoreResult<Arc<dyn DocumentStore>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<Arc<dyn DocumentStore>>>,
    {
        if let Some(existing) = self.cell.get() {
            debug!("Document store already initialized, reusing existing instance");
            return Ok(existing.clone());
        }
        self.cell.get_or_try_init(factory).await.cloned()
    }

    /// The store instance, if initialization has completed.
    pub fn get(&self) -> Option<Arc<dyn DocumentStore>> {
        self.cell.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::store::{Document, StoreSession};
    use crate::error::StoreError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NullStore;

    #[async_trait]
    impl DocumentStore for NullStore {
        async fn get_document(&self, _path: &str) -> StoreResult<Option<Document>> {
            Ok(None)
        }

        async fn enable_network(&self) -> StoreResult<()> {
            Ok(())
        }

        async fn disable_network(&self) -> StoreResult<()> {
            Ok(())
        }

        fn current_session(&self) -> Option<StoreSession> {
            None
        }
    }

    #[tokio::test]
    async fn factory_runs_once_and_instance_is_shared() {
        let handle = StoreHandle::new();
        let factory_calls = AtomicU32::new(0);

        let first = handle
            .get_or_init(|| async {
                factory_calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(NullStore) as Arc<dyn DocumentStore>)
            })
            .await
            .unwrap();
        let second = handle
            .get_or_init(|| async {
                factory_calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(NullStore) as Arc<dyn DocumentStore>)
            })
            .await
            .unwrap();

        assert_eq!(factory_calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failed_initialization_leaves_the_handle_empty() {
        let handle = StoreHandle::new();

        let result = handle
            .get_or_init(|| async { Err(StoreError::Unavailable("boot race".to_string())) })
            .await;
        assert!(result.is_err());
        assert!(handle.get().is_none());

        let retried = handle
            .get_or_init(|| async { Ok(Arc::new(NullStore) as Arc<dyn DocumentStore>) })
            .await;
        assert!(retried.is_ok());
        assert!(handle.get().is_some());
    }
}
