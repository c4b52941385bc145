//! Scaleway Domains and DNS Provider

mod error;
mod http;
mod provider;
mod types;

use crate::http_client::{AuthScheme, ProviderClient};
use crate::providers::common::Session;
use crate::types::ProviderOptions;

pub(crate) use types::ScalewayRecord;

pub(crate) const SCALEWAY_API_BASE: &str = "https://api.scaleway.com/domain/v2beta1";
/// Scaleway records API page size
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;
/// TTL of new records when none is configured
pub(crate) const DEFAULT_TTL: u32 = 3600;

/// Scaleway Domains and DNS Provider
pub struct ScalewayProvider {
    pub(crate) client: ProviderClient,
    pub(crate) session: Session<Vec<ScalewayRecord>>,
    pub(crate) ttl: Option<u32>,
}

impl ScalewayProvider {
    pub fn new(domain: &str, auth_secret_key: String, options: &ProviderOptions) -> Self {
        Self {
            client: ProviderClient::new(
                "scaleway",
                SCALEWAY_API_BASE,
                AuthScheme::Header {
                    name: "X-Auth-Token",
                    value: auth_secret_key,
                },
                options,
            ),
            session: Session::new("scaleway", domain),
            ttl: options.ttl,
        }
    }
}
