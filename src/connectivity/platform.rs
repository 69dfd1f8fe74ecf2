//! Platform capabilities consumed by the connectivity manager
//!
//! Network reachability and local storage enumeration live with the host
//! runtime, not with this crate. These traits are the seam: the embedding
//! application provides real implementations, tests provide recording fakes.

use async_trait::async_trait;

use crate::error::PlatformResult;

/// Reachability as reported by the host runtime.
///
/// This is a cheap local signal (interface up, radio on), not proof that
/// the store is reachable. Probes short-circuit on it to avoid pointless
/// remote calls.
pub trait NetworkStatus: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Local storage areas the emergency reset sweeps.
///
/// Each method covers one storage family of the host runtime: key-value
/// stores, named databases, registered background workers, and named
/// response caches. Enumeration and deletion are split so a sweep can
/// report exactly which deletions failed.
#[async_trait]
pub trait PlatformStorage: Send + Sync {
    async fn clear_key_value_stores(&self) -> PlatformResult<()>;

    async fn database_names(&self) -> PlatformResult<Vec<String>>;

    async fn delete_database(&self, name: &str) -> PlatformResult<()>;

    /// Unregister all background workers, returning how many were removed.
    async fn unregister_background_workers(&self) -> PlatformResult<u32>;

    async fn cache_names(&self) -> PlatformResult<Vec<String>>;

    async fn delete_cache(&self, name: &str) -> PlatformResult<()>;

    /// Ask the embedding application to reload itself after a reset.
    async fn request_reload(&self) -> PlatformResult<()>;
}
