//! # zonekit-provider
//!
//! Record-level DNS management for one zone over heterogeneous vendor APIs.
//! Callers create, list, update and delete single records; vendors that
//! group values into record sets are reconciled behind the scenes.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method | Update |
//! |----------|-------------|-------------|--------|
//! | [Hetzner Cloud DNS](https://docs.hetzner.cloud/reference/cloud#zones) | `hetzner` | Bearer Token | atomic (`set_records`) |
//! | [DevNomads](https://api.devnomads.nl/api/documentation#/Dns) | `devnomads` | Bearer Token | delete then create |
//! | [Scaleway Domains and DNS](https://www.scaleway.com/en/developers/api/domains-and-dns/) | `scaleway` | `X-Auth-Token` | atomic (`set`) |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: every provider listed above.
//! - **`hetzner`**, **`devnomads`**, **`scaleway`**: a single provider.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonekit_provider::{
//!     create_provider, ProviderConfig, ProviderCredentials, ProviderOptions, RecordFilter,
//!     RecordSelector,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut provider = create_provider(ProviderConfig {
//!         domain: "example.com".to_string(),
//!         credentials: ProviderCredentials::Hetzner {
//!             auth_token: "your-token".to_string(),
//!         },
//!         options: ProviderOptions::default(),
//!     })?;
//!
//!     // Resolve the zone id
//!     provider.authenticate().await?;
//!
//!     // Idempotent: a second call is a no-op
//!     provider.create_record("TXT", "_acme-challenge", "token").await?;
//!
//!     let records = provider
//!         .list_records(&RecordFilter::new(Some("TXT"), Some("_acme-challenge"), None))
//!         .await?;
//!     for record in &records {
//!         println!("{} {} {} ({})", record.name, record.rtype, record.content, record.id);
//!     }
//!
//!     // Removes only this value; the record set goes away once empty
//!     let selector =
//!         RecordSelector::from_parts(None, Some("TXT"), Some("_acme-challenge"), Some("token"))?;
//!     provider.delete_record(&selector).await?;
//!
//!     provider.cleanup().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! [`ProviderError::kind`] classifies every variant as authentication,
//! not-found, configuration, transport or decoding failure. Nothing is
//! retried by this crate.

mod error;
mod factory;
mod http_client;
mod providers;
pub mod rrset;
mod traits;
mod types;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export error types
pub use error::{ErrorKind, ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    CredentialValidationError, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    FieldType, ProviderConfig, ProviderCredentialField, ProviderCredentials, ProviderMetadata,
    ProviderOptions, ProviderState, ProviderType, Record, RecordFilter, RecordSelector, RecordSet,
    UpdateRecordRequest, Zone,
};

// Re-export name, content and identifier codecs
pub use utils::{content, identifier, names};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "hetzner")]
pub use providers::HetznerProvider;

#[cfg(feature = "devnomads")]
pub use providers::DevnomadsProvider;

#[cfg(feature = "scaleway")]
pub use providers::ScalewayProvider;
