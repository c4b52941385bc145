//! Utility modules.

/// Record content transport encoding (TXT quoting, CNAME canonicalization).
pub mod content;

/// Composite `<type>/<name>=<content>` identifiers.
pub mod identifier;

/// Log sanitization utilities to prevent sensitive data exposure.
pub(crate) mod log_sanitizer;

/// FQDN / relative name conversions.
pub mod names;

/// Serde helpers for lenient vendor payloads.
pub(crate) mod serde_ext;
