//! Hetzner Cloud DNS Provider
//!
//! Records are grouped into rrsets addressed by `{name}/{type}`; values are
//! changed through the rrset `actions/*` endpoints.

mod error;
mod http;
mod provider;
mod types;

use crate::http_client::{AuthScheme, ProviderClient};
use crate::providers::common::Session;
use crate::types::{ProviderOptions, Zone};

pub(crate) use types::{HetznerRrset, HetznerRrsetRecord};

pub(crate) const HETZNER_API_BASE: &str = "https://api.hetzner.cloud/v1/zones";
/// Hetzner rrsets API maximum page size
pub(crate) const MAX_PAGE_SIZE_RRSETS: u32 = 100;

/// Hetzner Cloud DNS Provider
pub struct HetznerProvider {
    pub(crate) client: ProviderClient,
    pub(crate) session: Session<Zone>,
    pub(crate) ttl: Option<u32>,
}

impl HetznerProvider {
    pub fn new(domain: &str, auth_token: String, options: &ProviderOptions) -> Self {
        Self {
            client: ProviderClient::new(
                "hetzner",
                HETZNER_API_BASE,
                AuthScheme::Bearer(auth_token),
                options,
            ),
            session: Session::new("hetzner", domain),
            ttl: options.ttl,
        }
    }
}
