//! # Worker Lookup Client
//!
//! HTTP client for the spreadsheet-backed worker directory endpoint.
//! The endpoint takes a free-form `search` term (matricule or national id)
//! and answers with a JSON array of positional rows; the first row wins.

use reqwest::{header, Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::LookupEndpointConfig;
use crate::error::{LookupError, LookupResult};
use crate::lookup::record::WorkerRecord;

/// HTTP client for worker directory lookups
pub struct WorkerLookupClient {
    client: Client,
    base_url: Url,
    config: LookupEndpointConfig,
}

impl std::fmt::Debug for WorkerLookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerLookupClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .field("date_policy", &self.config.date_policy)
            .finish()
    }
}

impl WorkerLookupClient {
    /// Create a new lookup client with the given configuration
    ///
    /// The endpoint URL is deployment-specific and has no usable default, so
    /// an empty `base_url` is rejected here rather than failing on first use.
    pub fn new(config: LookupEndpointConfig) -> LookupResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(LookupError::configuration(
                "Lookup endpoint URL is not configured (set lookup.base_url or ROSTER_LOOKUP_URL)",
            ));
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            LookupError::configuration(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("roster-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                LookupError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Created WorkerLookupClient for base_url: {}, timeout: {}ms",
            base_url, config.timeout_ms
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Look up a single worker by matricule or national id
    ///
    /// Sends the trimmed term as the `search` query parameter and maps the
    /// first matched row positionally. Every failure mode carries its own
    /// [`LookupError`] kind so callers can tell an unreachable endpoint from
    /// a genuine miss.
    pub async fn lookup(&self, term: &str) -> LookupResult<WorkerRecord> {
        let term = term.trim();
        if term.is_empty() {
            return Err(LookupError::EmptySearchTerm);
        }

        let request_id = Uuid::new_v4();
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("search", term);

        debug!(request_id = %request_id, "Looking up worker at: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(request_id = %request_id, "Directory request failed with status: {}", status);
            return Err(LookupError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let row = first_row(&body)?;
        let record = self.config.columns.map_row(&row, self.config.date_policy)?;

        info!(
            request_id = %request_id,
            "Worker lookup matched matricule: {}",
            record.matricule
        );
        Ok(record)
    }

    /// Look up a worker, collapsing every failure into `None`
    ///
    /// Legacy surface for callers that only distinguish "found" from "not
    /// found". The underlying failure kind is logged before it is dropped.
    pub async fn find(&self, term: &str) -> Option<WorkerRecord> {
        match self.lookup(term).await {
            Ok(record) => Some(record),
            Err(LookupError::NotFound) => {
                debug!("No worker matched search term");
                None
            }
            Err(e) => {
                error!("Worker lookup failed, reporting no result: {}", e);
                None
            }
        }
    }

    /// Get the base URL of the directory endpoint
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Get the configured timeout in milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }
}

/// Extract the first row from a directory response body.
///
/// The endpoint answers with an array of rows, each itself an array of
/// cells. An empty outer array means no match.
fn first_row(body: &str) -> LookupResult<Vec<Value>> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| LookupError::malformed(format!("Invalid JSON: {}", e)))?;
    let rows = parsed
        .as_array()
        .ok_or_else(|| LookupError::malformed("Response body is not an array"))?;
    let first = match rows.first() {
        Some(row) => row,
        None => return Err(LookupError::NotFound),
    };
    let row = first
        .as_array()
        .ok_or_else(|| LookupError::malformed("First row is not an array"))?;
    Ok(row.clone())
}
