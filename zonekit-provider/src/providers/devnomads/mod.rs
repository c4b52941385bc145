//! DevNomads DNS Provider
//!
//! The DevNomads API is the PowerDNS API behind client specific
//! authentication. Records have no ids of their own: identifiers are
//! synthesized as `type/name=content`, and every change is a PATCH replacing
//! a whole rrset.

mod error;
mod http;
mod provider;
mod types;

use crate::http_client::{AuthScheme, ProviderClient};
use crate::providers::common::Session;
use crate::types::ProviderOptions;

pub(crate) use types::{PdnsRecord, PdnsRrset, PdnsZone};

pub(crate) const DEVNOMADS_API_BASE: &str = "https://api.devnomads.nl/services/dns";
/// TTL of new rrsets when none is configured
pub(crate) const DEFAULT_TTL: u32 = 600;

/// DevNomads DNS Provider
pub struct DevnomadsProvider {
    pub(crate) client: ProviderClient,
    pub(crate) session: Session<PdnsZone>,
    pub(crate) ttl: Option<u32>,
}

impl DevnomadsProvider {
    pub fn new(domain: &str, auth_token: String, options: &ProviderOptions) -> Self {
        Self {
            client: ProviderClient::new(
                "devnomads",
                DEVNOMADS_API_BASE,
                AuthScheme::Bearer(auth_token),
                options,
            ),
            session: Session::new("devnomads", domain),
            ttl: options.ttl,
        }
    }
}
