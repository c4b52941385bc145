//! DevNomads error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DevnomadsProvider;
use super::types::PdnsErrorResponse;

/// PowerDNS answers 422 for rrsets it refuses (bad content, CNAME conflicts).
impl ProviderErrorMapper for DevnomadsProvider {
    fn provider_name(&self) -> &'static str {
        "devnomads"
    }

    fn parse_raw_error(&self, status: u16, body: &str) -> RawApiError {
        let raw = RawApiError::new(status, body);
        match serde_json::from_str::<PdnsErrorResponse>(body) {
            Ok(resp) if resp.errors.is_empty() => raw.with_message(None, resp.error),
            Ok(resp) => raw.with_message(None, format!("{} ({})", resp.error, resp.errors.join("; "))),
            Err(_) => raw,
        }
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.status {
            422 => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "rrset".to_string(),
                detail: raw.message,
            },
            _ => self.map_status(raw, context),
        }
    }
}
