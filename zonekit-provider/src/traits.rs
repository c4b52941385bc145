use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    ProviderMetadata, ProviderState, Record, RecordFilter, RecordSelector, UpdateRecordRequest,
};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status code
    pub status: u16,
    /// Vendor error code, if the body carried one
    pub code: Option<String>,
    /// Vendor error message, or the body itself
    pub message: String,
    /// Raw response body
    pub body: String,
}

impl RawApiError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status,
            code: None,
            message: body.clone(),
            body,
        }
    }

    pub fn with_message(mut self, code: Option<String>, message: impl Into<String>) -> Self {
        self.code = code;
        self.message = message.into();
        self
    }
}

/// Error context (internal use)
/// Extra information available while mapping an error
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Record being addressed (`type name` or identifier)
    pub record_id: Option<String>,
    /// Domain being addressed
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Default::default()
        }
    }

    pub fn record(domain: &str, record_id: impl Into<String>) -> Self {
        Self {
            record_id: Some(record_id.into()),
            domain: Some(domain.to_string()),
        }
    }
}

/// Provider error mapping trait (internal use)
///
/// Each provider extracts its vendor error payload into a [`RawApiError`]
/// and maps it onto the unified taxonomy.
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Pull the vendor's code/message out of a non-2xx body.
    fn parse_raw_error(&self, status: u16, body: &str) -> RawApiError;

    /// Map a raw API error onto the unified error type.
    ///
    /// Vendors override this to recognize their own error codes and fall back
    /// to [`map_status`](Self::map_status).
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        self.map_status(raw, context)
    }

    /// Status based mapping shared by every vendor.
    ///
    /// 401 is always a credential problem. 404 means the addressed record is
    /// gone, or the zone when no record was addressed. Everything else is a
    /// transport failure carrying status and body.
    fn map_status(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match (raw.status, context.record_id, context.domain) {
            (401, _, _) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            (404, Some(record_id), _) => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id,
                raw_message: Some(raw.message),
            },
            (404, None, Some(domain)) => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain,
                raw_message: Some(raw.message),
            },
            _ => self.transport_error(raw),
        }
    }

    /// Shortcut: transport error (fallback)
    fn transport_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Transport {
            provider: self.provider_name().to_string(),
            status: raw.status,
            raw_code: raw.code,
            raw_message: raw.message,
            body: raw.body,
        }
    }
}

/// DNS provider trait
///
/// One instance manages one domain and moves through
/// `uninitialized → authenticated → operating → released`. Record operations
/// take `&mut self`: an instance caches a zone snapshot and is never shared
/// between concurrent callers.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Provider metadata (type level)
    ///
    /// Available without an instance.
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Authoritative nameservers of the vendor. No network call.
    fn nameservers(&self) -> Vec<String>;

    /// Domain this instance manages.
    fn domain(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> ProviderState;

    /// Resolve the vendor zone id for the domain.
    async fn authenticate(&mut self) -> Result<()>;

    /// List records matching every given filter term.
    async fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>>;

    /// Create a record. Returns `true` also when an identical record exists.
    async fn create_record(&mut self, rtype: &str, name: &str, content: &str) -> Result<bool>;

    /// Update the record located by `req.target`.
    async fn update_record(&mut self, req: &UpdateRecordRequest) -> Result<bool>;

    /// Delete matching record values, or the whole set when no content is given.
    /// Returns `true` when nothing matched.
    async fn delete_record(&mut self, selector: &RecordSelector) -> Result<bool>;

    /// Release held resources. No-op when nothing is held.
    async fn cleanup(&mut self) -> Result<()>;
}
