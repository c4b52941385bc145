//! Hetzner error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::HetznerProvider;
use super::types::HetznerErrorResponse;

/// Hetzner Cloud error code mapping
/// Reference: <https://docs.hetzner.cloud/reference/cloud#errors>
impl ProviderErrorMapper for HetznerProvider {
    fn provider_name(&self) -> &'static str {
        "hetzner"
    }

    fn parse_raw_error(&self, status: u16, body: &str) -> RawApiError {
        let raw = RawApiError::new(status, body);
        match serde_json::from_str::<HetznerErrorResponse>(body) {
            Ok(resp) => raw.with_message(Some(resp.error.code), resp.error.message),
            Err(_) => raw,
        }
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("unauthorized") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("invalid_input" | "json_error") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "rrset".to_string(),
                detail: raw.message,
            },
            _ => self.map_status(raw, context),
        }
    }
}
