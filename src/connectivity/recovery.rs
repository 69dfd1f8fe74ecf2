//! Emergency recovery
//!
//! Last-resort repair for a client whose local state is wedged beyond what
//! reconnection can fix: clear every platform storage area, then ask the
//! embedding application to reload. Destructive and never triggered
//! automatically.

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::connectivity::manager::{ConnectivityManager, ConnectivityResult};
use crate::connectivity::platform::PlatformStorage;

impl ConnectivityManager {
    /// Clear all platform storage and request an application reload.
    ///
    /// The sweep is best-effort: each storage family is cleared
    /// independently, failures are collected instead of aborting, and the
    /// reload is requested even when earlier steps failed. Completed
    /// deletions are never rolled back. The result lists every step that
    /// failed.
    pub async fn emergency_reset(&self, platform: &dyn PlatformStorage) -> ConnectivityResult {
        warn!("Emergency recovery triggered, clearing all local storage");
        let mut failures: Vec<String> = Vec::new();

        if let Err(e) = platform.clear_key_value_stores().await {
            error!(error = %e, "Failed to clear key-value stores");
            failures.push(format!("key-value stores: {e}"));
        }

        match platform.database_names().await {
            Ok(names) => {
                let deletions =
                    join_all(names.iter().map(|name| platform.delete_database(name))).await;
                for (name, result) in names.iter().zip(deletions) {
                    if let Err(e) = result {
                        error!(database = %name, error = %e, "Failed to delete database");
                        failures.push(format!("database {name}: {e}"));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to enumerate databases");
                failures.push(format!("database enumeration: {e}"));
            }
        }

        match platform.unregister_background_workers().await {
            Ok(count) => info!(unregistered = count, "Background workers unregistered"),
            Err(e) => {
                error!(error = %e, "Failed to unregister background workers");
                failures.push(format!("background workers: {e}"));
            }
        }

        match platform.cache_names().await {
            Ok(names) => {
                let deletions = join_all(names.iter().map(|name| platform.delete_cache(name))).await;
                for (name, result) in names.iter().zip(deletions) {
                    if let Err(e) = result {
                        error!(cache = %name, error = %e, "Failed to delete cache");
                        failures.push(format!("cache {name}: {e}"));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to enumerate caches");
                failures.push(format!("cache enumeration: {e}"));
            }
        }

        if let Err(e) = platform.request_reload().await {
            error!(error = %e, "Failed to request reload after storage reset");
            failures.push(format!("reload request: {e}"));
        }

        if failures.is_empty() {
            info!("Emergency recovery completed cleanly");
            ConnectivityResult::ok()
        } else {
            warn!(
                failure_count = failures.len(),
                "Emergency recovery completed with failures"
            );
            ConnectivityResult::failed(format!(
                "emergency recovery incomplete: {}",
                failures.join("; ")
            ))
        }
    }
}
