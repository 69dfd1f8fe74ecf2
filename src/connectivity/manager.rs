//! # Connectivity Manager
//!
//! Probes and controls the document store's online state. The manager
//! answers one question cheaply and honestly: can the store be reached
//! right now? It short-circuits on local signals where possible, races
//! every remote check against a timeout, retries transient failures with
//! exponential backoff, and reports terminal failures with a diagnostic
//! specific enough to act on.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ConnectivityConfig;
use crate::connectivity::platform::NetworkStatus;
use crate::connectivity::store::DocumentStore;
use crate::error::StoreError;

/// Outcome of a connectivity operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityResult {
    pub success: bool,
    /// Failure diagnostic, present when `success` is false
    pub error: Option<String>,
}

impl ConnectivityResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Connectivity state of the document store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectivityStatus {
    /// No probe has run yet
    Untested,
    /// A probe is currently in flight
    Checking,
    /// The last probe confirmed the store is reachable
    Healthy,
    /// The last probe failed
    Degraded {
        /// Reason the store is considered unreachable
        reason: String,
    },
    /// The network layer was explicitly disabled
    OfflineForced,
}

impl ConnectivityStatus {
    /// Check if the last probe confirmed reachability
    pub fn is_healthy(&self) -> bool {
        matches!(self, ConnectivityStatus::Healthy)
    }

    /// Check if the state warrants operator attention
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            ConnectivityStatus::Degraded { .. } | ConnectivityStatus::OfflineForced
        )
    }

    /// Get a human-readable description of the connectivity state
    pub fn description(&self) -> String {
        match self {
            ConnectivityStatus::Untested => "Untested - no probe has run".to_string(),
            ConnectivityStatus::Checking => "Checking - probe in flight".to_string(),
            ConnectivityStatus::Healthy => "Healthy - store reachable".to_string(),
            ConnectivityStatus::Degraded { reason } => format!("Degraded - {reason}"),
            ConnectivityStatus::OfflineForced => {
                "Offline - network layer disabled by request".to_string()
            }
        }
    }
}

/// Connectivity probing and network-layer control for the document store
pub struct ConnectivityManager {
    store: Arc<dyn DocumentStore>,
    network: Arc<dyn NetworkStatus>,
    config: ConnectivityConfig,
    status: RwLock<ConnectivityStatus>,
}

impl std::fmt::Debug for ConnectivityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityManager")
            .field("sentinel_path", &self.config.sentinel_path)
            .field("probe_timeout_ms", &self.config.probe_timeout_ms)
            .field("max_retries", &self.config.max_retries)
            .field("status", &*self.status.read())
            .finish()
    }
}

impl ConnectivityManager {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        network: Arc<dyn NetworkStatus>,
        config: ConnectivityConfig,
    ) -> Self {
        info!(
            sentinel_path = %config.sentinel_path,
            probe_timeout_ms = config.probe_timeout_ms,
            max_retries = config.max_retries,
            "Connectivity manager initialized"
        );
        Self {
            store,
            network,
            config,
            status: RwLock::new(ConnectivityStatus::Untested),
        }
    }

    /// Current connectivity status
    pub fn status(&self) -> ConnectivityStatus {
        self.status.read().clone()
    }

    fn set_status(&self, status: ConnectivityStatus) {
        *self.status.write() = status;
    }

    /// Probe whether the document store is reachable.
    ///
    /// The probe short-circuits twice before touching the network: a
    /// runtime that reports offline fails immediately, and a missing
    /// session succeeds immediately since an unauthenticated read would
    /// only measure security rules, not connectivity. Otherwise it fetches
    /// the sentinel document, racing each attempt against
    /// `probe_timeout_ms`. Transient failures retry with exponential
    /// backoff; permission and precondition failures are terminal and
    /// reported with a specific diagnostic.
    pub async fn probe(&self) -> ConnectivityResult {
        let probe_id = Uuid::new_v4();
        self.set_status(ConnectivityStatus::Checking);

        if !self.network.is_online() {
            warn!(probe_id = %probe_id, "Runtime reports offline, skipping remote probe");
            let message = "runtime reports offline";
            self.set_status(ConnectivityStatus::Degraded {
                reason: message.to_string(),
            });
            return ConnectivityResult::failed(message);
        }

        let session = match self.store.current_session() {
            Some(session) => session,
            None => {
                debug!(probe_id = %probe_id, "No authenticated session, probe succeeds without a remote call");
                self.set_status(ConnectivityStatus::Healthy);
                return ConnectivityResult::ok();
            }
        };

        debug!(
            probe_id = %probe_id,
            user_id = %session.user_id,
            sentinel_path = %self.config.sentinel_path,
            "Probing document store connectivity"
        );

        let probe_timeout = Duration::from_millis(self.config.probe_timeout_ms);
        let mut delay = Duration::from_millis(self.config.retry_base_delay_ms);
        let mut last_failure = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(
                    probe_id = %probe_id,
                    retry = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying connectivity probe after backoff"
                );
                sleep(delay).await;
                // Products that are not representable as a delay (negative,
                // non-finite, overflowing) keep the previous delay.
                delay = Duration::try_from_secs_f64(
                    delay.as_secs_f64() * self.config.retry_backoff_multiplier,
                )
                .unwrap_or(delay);
            }

            match timeout(
                probe_timeout,
                self.store.get_document(&self.config.sentinel_path),
            )
            .await
            {
                Ok(Ok(_)) => {
                    info!(probe_id = %probe_id, attempt, "Connectivity probe succeeded");
                    self.set_status(ConnectivityStatus::Healthy);
                    return ConnectivityResult::ok();
                }
                Ok(Err(e)) if !e.is_transient() => {
                    let message = terminal_diagnostic(&e);
                    error!(
                        probe_id = %probe_id,
                        attempt,
                        error = %e,
                        "Connectivity probe failed with a terminal error"
                    );
                    self.set_status(ConnectivityStatus::Degraded {
                        reason: message.clone(),
                    });
                    return ConnectivityResult::failed(message);
                }
                Ok(Err(e)) => {
                    warn!(
                        probe_id = %probe_id,
                        attempt,
                        error = %e,
                        "Connectivity probe failed with a transient error"
                    );
                    last_failure = e.to_string();
                }
                Err(_) => {
                    warn!(
                        probe_id = %probe_id,
                        attempt,
                        timeout_ms = self.config.probe_timeout_ms,
                        "Connectivity probe timed out"
                    );
                    last_failure = format!("timed out after {}ms", self.config.probe_timeout_ms);
                }
            }
        }

        let message = format!(
            "store unreachable after {} attempts: {}",
            self.config.max_retries + 1,
            last_failure
        );
        error!(probe_id = %probe_id, "Connectivity probe exhausted retries: {}", last_failure);
        self.set_status(ConnectivityStatus::Degraded {
            reason: message.clone(),
        });
        ConnectivityResult::failed(message)
    }

    /// Disable the store's network layer, forcing cache-only reads.
    pub async fn force_offline(&self) -> ConnectivityResult {
        match self.store.disable_network().await {
            Ok(()) => {
                info!("Store network layer disabled");
                self.set_status(ConnectivityStatus::OfflineForced);
                ConnectivityResult::ok()
            }
            Err(e) => {
                error!(error = %e, "Failed to disable store network layer");
                ConnectivityResult::failed(format!("failed to disable network: {e}"))
            }
        }
    }

    /// Re-enable the store's network layer.
    ///
    /// Success resets the status to [`ConnectivityStatus::Untested`]: the
    /// layer is up again but reachability is unknown until the next probe.
    pub async fn force_online(&self) -> ConnectivityResult {
        match self.store.enable_network().await {
            Ok(()) => {
                info!("Store network layer enabled");
                self.set_status(ConnectivityStatus::Untested);
                ConnectivityResult::ok()
            }
            Err(e) => {
                error!(error = %e, "Failed to enable store network layer");
                ConnectivityResult::failed(format!("failed to enable network: {e}"))
            }
        }
    }

    /// Spawn a background task that recovers connectivity automatically.
    ///
    /// `network_events` carries the runtime's reachability signal. On each
    /// observed offline-to-online transition the task re-enables the store's
    /// network layer and runs one probe; outcomes are logged, never
    /// returned. The baseline is snapshotted before the task is spawned, so
    /// a transition that lands before its first poll still registers as a
    /// change. Recoveries run serially on the channel's latest value: a
    /// flap that completes while a recovery is in flight is coalesced away
    /// rather than queued. The task exits when the sender side of the
    /// channel is dropped.
    pub fn spawn_reconnect_watcher(
        self: Arc<Self>,
        mut network_events: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        // Snapshot before spawning: a transition that lands before the
        // task's first poll must compare against the creation-time state.
        let mut was_online = *network_events.borrow_and_update();
        tokio::spawn(async move {
            while network_events.changed().await.is_ok() {
                let online = *network_events.borrow_and_update();
                if online && !was_online {
                    info!("Network connectivity regained, attempting store recovery");
                    if let Err(e) = self.store.enable_network().await {
                        warn!(error = %e, "Failed to re-enable store network layer during recovery");
                    }
                    let result = self.probe().await;
                    if result.success {
                        info!("Reconnect recovery probe succeeded");
                    } else {
                        warn!(
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "Reconnect recovery probe failed"
                        );
                    }
                }
                was_online = online;
            }
            debug!("Network event channel closed, reconnect watcher exiting");
        })
    }
}

/// Diagnostic message for a terminal probe failure.
///
/// Permission and precondition failures have known causes worth naming;
/// everything else is reported as-is.
fn terminal_diagnostic(error: &StoreError) -> String {
    match error {
        StoreError::PermissionDenied(_) => {
            "permission denied by store security rules; check the authenticated role's read access to the sentinel document".to_string()
        }
        StoreError::FailedPrecondition(_) => {
            "store precondition failed; local persistence may be disabled or held by another instance".to_string()
        }
        other => format!("store request failed: {other}"),
    }
}
