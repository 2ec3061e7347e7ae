//! Panel API client
//!
//! Provides a typed HTTP client for the panel's client API. Handles the
//! bearer credential, content negotiation headers, per-request timeouts and
//! the mapping of transport failures onto [`SyncError`] kinds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pterosync_panel::client::PanelClient;
//!
//! # async fn example() -> Result<(), pterosync_core::domain::SyncError> {
//! let client = PanelClient::new("https://panel.example.net", "ptlc_api_key")?;
//! let servers = pterosync_panel::servers::list_servers(&client).await?;
//! println!("{} servers", servers.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use pterosync_core::domain::SyncError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Path prefix of the panel's client API
const CLIENT_API_PREFIX: &str = "/api/client";

/// Versioned media type the panel expects in `Accept`
pub const PANEL_MEDIA_TYPE: &str = "application/vnd.pterodactyl.v1+json";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for one file transfer to a signed upload URL
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Error bodies longer than this are truncated before being logged or stored
const MAX_ERROR_BODY_LEN: usize = 512;

// ============================================================================
// PanelClient
// ============================================================================

/// HTTP client for panel API calls
///
/// Wraps `reqwest::Client` with authentication headers, a request timeout and
/// base URL construction. Cheap to share behind an `Arc`; all methods take
/// `&self`.
#[derive(Debug, Clone)]
pub struct PanelClient {
    /// The underlying HTTP client
    client: Client,
    /// Panel root URL without a trailing slash
    base_url: String,
    /// Client API key sent as a bearer credential
    api_key: String,
    /// Deadline for API requests
    timeout: Duration,
    /// Deadline for file transfers
    upload_timeout: Duration,
}

impl PanelClient {
    /// Creates a new client with the [`DEFAULT_TIMEOUT`]
    ///
    /// # Arguments
    /// * `base_url` - Panel root URL, e.g. `https://panel.example.net`
    /// * `api_key` - A client API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SyncError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a new client with a custom per-request timeout
    ///
    /// `timeout` bounds connection setup and every API request. File
    /// transfers are bounded by [`PanelClient::upload_timeout`] instead.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SyncError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT.max(timeout),
        })
    }

    /// Sets the deadline for a single file transfer
    #[must_use]
    pub fn with_upload_timeout(mut self, upload_timeout: Duration) -> Self {
        self.upload_timeout = upload_timeout;
        self
    }

    /// Deadline for API requests
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Deadline for a single file transfer
    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Returns the panel root URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Creates an authenticated request builder for a client API path
    ///
    /// Prepends `{base_url}/api/client` and adds the bearer credential and
    /// the panel's `Accept` header.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path below the client API, e.g. `/servers/abc/files/list`
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, CLIENT_API_PREFIX, path);
        self.client
            .request(method, &url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, PANEL_MEDIA_TYPE)
    }

    /// Returns the underlying HTTP client
    ///
    /// Used for requests to absolute URLs (signed upload destinations) that
    /// must not carry the API key.
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Sends a request, mapping transport failures onto [`SyncError`]
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, SyncError> {
    request.send().await.map_err(map_transport_error)
}

/// Decodes a JSON body, reporting non-JSON bodies as malformed
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
    let url = response.url().clone();
    let bytes = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!(%url, error = %e, "Response body is not the expected JSON");
        SyncError::MalformedResponse(format!("{url}: {e}"))
    })
}

/// Builds an [`SyncError::UnexpectedStatus`] from a response, keeping a
/// truncated copy of the body for diagnostics
pub(crate) async fn unexpected_status(response: Response) -> SyncError {
    let status = response.status().as_u16();
    let mut body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_string());

    if body.len() > MAX_ERROR_BODY_LEN {
        let mut cut = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }

    SyncError::UnexpectedStatus { status, body }
}

/// Classifies a reqwest error as a timeout, a decode problem or a
/// connection-level failure
pub(crate) fn map_transport_error(err: reqwest::Error) -> SyncError {
    if err.is_timeout() {
        SyncError::NetworkTimeout(err.to_string())
    } else if err.is_decode() {
        SyncError::MalformedResponse(err.to_string())
    } else {
        SyncError::NetworkError(err.to_string())
    }
}
