#![allow(clippy::doc_markdown)] // Allow technical terms like TOML, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Roster Client
//!
//! Client-side data access layer for the Roster workforce application.
//!
//! ## Overview
//!
//! Roster field devices work against two upstream surfaces: a
//! spreadsheet-backed worker directory reached over HTTP, and a vendor
//! document store that syncs attendance data and goes offline routinely.
//! This crate owns both integrations so the application code above it only
//! sees typed records and explicit failure kinds.
//!
//! ## Components
//!
//! - **Worker lookup**: query the directory endpoint by matricule or
//!   national id and map its positional rows into [`WorkerRecord`]s,
//!   including entry-date normalization to canonical `YYYY-MM-DD` form.
//! - **Connectivity**: probe the document store with timeouts and
//!   exponential backoff, force it online or offline, recover
//!   automatically on network transitions, and as a last resort wipe
//!   local platform storage and reload.
//!
//! ## Module Organization
//!
//! - [`lookup`] - Worker directory HTTP client and row mapping
//! - [`dates`] - Entry date normalization policies
//! - [`connectivity`] - Store probing, network control, and recovery
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster_client::{RosterConfig, WorkerLookupClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! roster_client::logging::init_tracing();
//!
//! let config = RosterConfig::load()?;
//! let client = WorkerLookupClient::new(config.lookup)?;
//!
//! if let Some(worker) = client.find("M1234").await {
//!     println!("{} joined on {:?}", worker.full_name, worker.entry_date);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connectivity;
pub mod dates;
pub mod error;
pub mod logging;
pub mod lookup;

pub use config::{ConnectivityConfig, LookupEndpointConfig, RosterConfig};
pub use connectivity::{
    ConnectivityManager, ConnectivityResult, ConnectivityStatus, Document, DocumentStore,
    NetworkStatus, PlatformStorage, StoreHandle, StoreSession,
};
pub use dates::DatePolicy;
pub use error::{
    ConfigError, ConfigResult, LookupError, LookupResult, PlatformError, PlatformResult,
    StoreError, StoreResult,
};
pub use lookup::{ColumnMapping, Gender, WorkerLookupClient, WorkerRecord};
