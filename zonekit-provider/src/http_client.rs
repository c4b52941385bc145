//! Vendor HTTP client
//!
//! One [`ProviderClient`] per provider instance: it owns the base URL and the
//! authentication scheme and issues exactly one request per call.
//!
//! # design principles
//! - **No retries** - every non-2xx answer is returned to the caller at once
//! - **Authentication is injected, never passed per call** - bearer token or custom header
//! - **Transport and decoding failures stay distinct** - `Transport`/`NetworkError` vs `ParseError`

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, ProviderErrorMapper};
use crate::types::ProviderOptions;
use crate::utils::log_sanitizer::{redact_secret, truncate_for_log};

/// How a vendor authenticates requests.
#[derive(Clone)]
pub(crate) enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `<name>: <value>`
    Header {
        name: &'static str,
        value: String,
    },
}

impl AuthScheme {
    fn secret(&self) -> &str {
        match self {
            Self::Bearer(token) => token,
            Self::Header { value, .. } => value,
        }
    }

    /// Whether the credential is absent or blank.
    pub fn is_missing(&self) -> bool {
        self.secret().trim().is_empty()
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::Header { name, value } => request.header(*name, value),
        }
    }
}

impl std::fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer({})", redact_secret(token)),
            Self::Header { name, value } => write!(f, "Header({name}: {})", redact_secret(value)),
        }
    }
}

/// Authenticated JSON client for one vendor endpoint.
#[derive(Debug, Clone)]
pub(crate) struct ProviderClient {
    client: Client,
    base_url: String,
    auth: AuthScheme,
    provider: &'static str,
}

impl ProviderClient {
    pub fn new(
        provider: &'static str,
        default_base_url: &str,
        auth: AuthScheme,
        options: &ProviderOptions,
    ) -> Self {
        let base_url = options
            .api_endpoint
            .as_deref()
            .unwrap_or(default_base_url)
            .trim_end_matches('/')
            .to_string();
        Self {
            client: create_http_client(options),
            base_url,
            auth,
            provider,
        }
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fails before any request when the credential is blank.
    pub fn require_credentials(&self) -> Result<()> {
        if self.auth.is_missing() {
            return Err(ProviderError::InvalidCredentials {
                provider: self.provider.to_string(),
                raw_message: Some("credential is missing".to_string()),
            });
        }
        Ok(())
    }

    /// Sends one request and returns status and body text.
    ///
    /// Only network-level failures are errors here; status handling is left
    /// to [`request_json`](Self::request_json).
    pub async fn execute<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(u16, String)> {
        let url = format!("{}{}", self.base_url, path);
        let provider = self.provider;
        log::debug!("[{provider}] {method} {url}");

        let mut request = self.auth.apply(self.client.request(method, &url));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            let payload =
                serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                    provider: provider.to_string(),
                    detail: e.to_string(),
                })?;
            log::debug!("[{provider}] Request Body: {}", truncate_for_log(&payload));
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider}] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Sends one request, fails on any non-2xx status and parses the body.
    pub async fn request_json<T, B, M>(
        &self,
        mapper: &M,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
        M: ProviderErrorMapper + Sync,
    {
        let (status, text) = self.execute(method, path, query, body).await?;
        check_status(mapper, status, &text, ctx)?;
        parse_json(&text, self.provider)
    }
}

/// Create an HTTP client with the configured timeouts.
fn create_http_client(options: &ProviderOptions) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
        .timeout(Duration::from_secs(options.request_timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

/// Turns a non-2xx answer into the mapped provider error.
pub(crate) fn check_status<M: ProviderErrorMapper + ?Sized>(
    mapper: &M,
    status: u16,
    text: &str,
    ctx: ErrorContext,
) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let err = mapper.map_error(mapper.parse_raw_error(status, text), ctx);
    if err.is_expected() {
        log::warn!("{err}");
    } else {
        log::error!("{err}");
    }
    Err(err)
}

/// Parse a JSON response body.
///
/// An empty body (HTTP 204) is parsed as `null`, so callers expecting no
/// payload can ask for `()` or [`serde::de::IgnoredAny`].
pub(crate) fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let text = if response_text.trim().is_empty() {
        "null"
    } else {
        response_text
    };
    serde_json::from_str(text).map_err(|e| {
        log::error!("[{provider_name}] JSON parse failed: {e}");
        log::error!(
            "[{provider_name}] Raw response: {}",
            truncate_for_log(response_text)
        );
        ProviderError::ParseError {
            provider: provider_name.to_string(),
            detail: e.to_string(),
        }
    })
}
