//! Recording fakes for the document store and platform storage boundaries.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use roster_client::{
    Document, DocumentStore, NetworkStatus, PlatformError, PlatformResult, PlatformStorage,
    StoreError, StoreResult, StoreSession,
};

/// Scripted outcome for one sentinel fetch.
pub enum ProbeOutcome {
    Found,
    Missing,
    Fail(StoreError),
    /// Delays for the given duration before reporting a missing document.
    Stall(Duration),
    /// Never completes within any probe timeout.
    Hang,
}

/// Document store fake with scripted fetch outcomes and call recording.
///
/// Outcomes are consumed front to back; once the script is exhausted every
/// further fetch reports a missing document, which probes count as success.
pub struct MockStore {
    session: Option<StoreSession>,
    outcomes: Mutex<VecDeque<ProbeOutcome>>,
    network_toggle_error: Option<StoreError>,
    get_calls: AtomicU32,
    enable_calls: AtomicU32,
    disable_calls: AtomicU32,
    requested_paths: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            session: None,
            outcomes: Mutex::new(VecDeque::new()),
            network_toggle_error: None,
            get_calls: AtomicU32::new(0),
            enable_calls: AtomicU32::new(0),
            disable_calls: AtomicU32::new(0),
            requested_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn with_session(mut self, user_id: &str) -> Self {
        self.session = Some(StoreSession::new(user_id));
        self
    }

    pub fn with_outcomes(self, outcomes: Vec<ProbeOutcome>) -> Self {
        *self.outcomes.lock() = outcomes.into();
        self
    }

    pub fn with_network_toggle_error(mut self, error: StoreError) -> Self {
        self.network_toggle_error = Some(error);
        self
    }

    pub fn get_document_calls(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn enable_network_calls(&self) -> u32 {
        self.enable_calls.load(Ordering::SeqCst)
    }

    pub fn disable_network_calls(&self) -> u32 {
        self.disable_calls.load(Ordering::SeqCst)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.requested_paths.lock().clone()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn get_document(&self, path: &str) -> StoreResult<Option<Document>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_paths.lock().push(path.to_string());
        let outcome = self.outcomes.lock().pop_front();
        match outcome {
            None | Some(ProbeOutcome::Missing) => Ok(None),
            Some(ProbeOutcome::Found) => Ok(Some(Document::new(
                path,
                json!({ "purpose": "connectivity" }),
            ))),
            Some(ProbeOutcome::Fail(error)) => Err(error),
            Some(ProbeOutcome::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            Some(ProbeOutcome::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }

    async fn enable_network(&self) -> StoreResult<()> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        match &self.network_toggle_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn disable_network(&self) -> StoreResult<()> {
        self.disable_calls.fetch_add(1, Ordering::SeqCst);
        match &self.network_toggle_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn current_session(&self) -> Option<StoreSession> {
        self.session.clone()
    }
}

/// Fixed reachability signal.
pub struct StaticNetwork(pub bool);

impl NetworkStatus for StaticNetwork {
    fn is_online(&self) -> bool {
        self.0
    }
}

/// What a recovery sweep did to the platform fake.
#[derive(Debug, Default, Clone)]
pub struct PlatformCalls {
    pub cleared_key_value_stores: bool,
    pub deleted_databases: Vec<String>,
    pub unregistered_workers: bool,
    pub deleted_caches: Vec<String>,
    pub reload_requested: bool,
}

/// Platform storage fake with injectable failures and call recording.
#[derive(Default)]
pub struct MockPlatform {
    databases: Vec<String>,
    caches: Vec<String>,
    fail_key_value_clear: bool,
    fail_database: Option<String>,
    calls: Mutex<PlatformCalls>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases(mut self, names: &[&str]) -> Self {
        self.databases = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_caches(mut self, names: &[&str]) -> Self {
        self.caches = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_failing_key_value_clear(mut self) -> Self {
        self.fail_key_value_clear = true;
        self
    }

    pub fn with_failing_database(mut self, name: &str) -> Self {
        self.fail_database = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> PlatformCalls {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PlatformStorage for MockPlatform {
    async fn clear_key_value_stores(&self) -> PlatformResult<()> {
        if self.fail_key_value_clear {
            return Err(PlatformError::Storage("key-value store locked".to_string()));
        }
        self.calls.lock().cleared_key_value_stores = true;
        Ok(())
    }

    async fn database_names(&self) -> PlatformResult<Vec<String>> {
        Ok(self.databases.clone())
    }

    async fn delete_database(&self, name: &str) -> PlatformResult<()> {
        if self.fail_database.as_deref() == Some(name) {
            return Err(PlatformError::Storage(format!("database {name} is busy")));
        }
        self.calls.lock().deleted_databases.push(name.to_string());
        Ok(())
    }

    async fn unregister_background_workers(&self) -> PlatformResult<u32> {
        self.calls.lock().unregistered_workers = true;
        Ok(2)
    }

    async fn cache_names(&self) -> PlatformResult<Vec<String>> {
        Ok(self.caches.clone())
    }

    async fn delete_cache(&self, name: &str) -> PlatformResult<()> {
        self.calls.lock().deleted_caches.push(name.to_string());
        Ok(())
    }

    async fn request_reload(&self) -> PlatformResult<()> {
        self.calls.lock().reload_requested = true;
        Ok(())
    }
}

/// Poll `condition` until it holds or `deadline_ms` elapses.
pub async fn wait_until(deadline_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(deadline_ms);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
