//! Scaleway error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::ScalewayProvider;
use super::types::ScalewayErrorResponse;

/// Scaleway error type mapping
/// Reference: <https://www.scaleway.com/en/docs/api-cli/using-api/api-error-codes/>
impl ProviderErrorMapper for ScalewayProvider {
    fn provider_name(&self) -> &'static str {
        "scaleway"
    }

    fn parse_raw_error(&self, status: u16, body: &str) -> RawApiError {
        let raw = RawApiError::new(status, body);
        match serde_json::from_str::<ScalewayErrorResponse>(body) {
            Ok(resp) if !resp.message.is_empty() => raw.with_message(resp.error_type, resp.message),
            _ => raw,
        }
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("denied_authentication" | "authentication_failed") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }
            Some("invalid_arguments") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "records".to_string(),
                detail: raw.message,
            },
            _ => self.map_status(raw, context),
        }
    }
}
