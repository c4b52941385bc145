//! Provider factory functions and metadata.

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{ProviderConfig, ProviderCredentials, ProviderMetadata};

#[cfg(feature = "devnomads")]
use crate::providers::DevnomadsProvider;
#[cfg(feature = "hetzner")]
use crate::providers::HetznerProvider;
#[cfg(feature = "scaleway")]
use crate::providers::ScalewayProvider;

/// Creates a [`DnsProvider`] for one domain from the given configuration.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is still `uninitialized`; call
/// [`DnsProvider::authenticate`] before any record operation.
///
/// # Examples
///
/// ```rust,no_run
/// use zonekit_provider::{create_provider, ProviderConfig, ProviderCredentials, ProviderOptions};
///
/// let provider = create_provider(ProviderConfig {
///     domain: "example.com".to_string(),
///     credentials: ProviderCredentials::Hetzner {
///         auth_token: "your-token".to_string(),
///     },
///     options: ProviderOptions::default(),
/// }).unwrap();
/// assert_eq!(provider.id(), "hetzner");
/// ```
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn DnsProvider>> {
    let ProviderConfig {
        domain,
        credentials,
        options,
    } = config;

    if domain.trim().trim_end_matches('.').is_empty() {
        return Err(crate::error::ProviderError::InvalidArguments {
            operation: "create_provider".to_string(),
            detail: "domain must not be empty".to_string(),
        });
    }

    log::debug!(
        "creating {} provider for {domain}",
        credentials.provider_type()
    );

    match credentials {
        #[cfg(feature = "hetzner")]
        ProviderCredentials::Hetzner { auth_token } => Ok(Box::new(HetznerProvider::new(
            &domain, auth_token, &options,
        ))),
        #[cfg(feature = "devnomads")]
        ProviderCredentials::Devnomads { auth_token } => Ok(Box::new(DevnomadsProvider::new(
            &domain, auth_token, &options,
        ))),
        #[cfg(feature = "scaleway")]
        ProviderCredentials::Scaleway { auth_secret_key } => Ok(Box::new(
            ScalewayProvider::new(&domain, auth_secret_key, &options),
        )),
    }
}

/// Returns metadata for all providers enabled via feature flags.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "hetzner")]
        HetznerProvider::metadata(),
        #[cfg(feature = "devnomads")]
        DevnomadsProvider::metadata(),
        #[cfg(feature = "scaleway")]
        ScalewayProvider::metadata(),
    ]
}
