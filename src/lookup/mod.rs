//! Worker Directory Lookup
//!
//! HTTP client for the spreadsheet-backed worker directory, plus the
//! positional row mapping that turns directory rows into typed records.

pub mod client;
pub mod record;

pub use client::WorkerLookupClient;
pub use record::{ColumnMapping, Gender, WorkerRecord};
