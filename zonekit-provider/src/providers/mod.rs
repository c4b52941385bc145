//! DNS Provider implementations

pub(crate) mod common;

#[cfg(feature = "devnomads")]
mod devnomads;
#[cfg(feature = "hetzner")]
mod hetzner;
#[cfg(feature = "scaleway")]
mod scaleway;

#[cfg(feature = "devnomads")]
pub use devnomads::DevnomadsProvider;
#[cfg(feature = "hetzner")]
pub use hetzner::HetznerProvider;
#[cfg(feature = "scaleway")]
pub use scaleway::ScalewayProvider;
