//! Document Store Connectivity
//!
//! Probing, network-layer control, and escalating recovery for the vendor
//! document store, behind narrow traits so the vendor client and the host
//! runtime stay out of this crate.

pub mod handle;
pub mod manager;
pub mod platform;
pub mod recovery;
pub mod store;

pub use handle::StoreHandle;
pub use manager::{ConnectivityManager, ConnectivityResult, ConnectivityStatus};
pub use platform::{NetworkStatus, PlatformStorage};
pub use store::{Document, DocumentStore, StoreSession};
