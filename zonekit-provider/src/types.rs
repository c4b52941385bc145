use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

// ============ Records ============

/// A single DNS record as seen by callers.
///
/// Grouped vendors produce one `Record` per value of a record set; every such
/// record shares the parent set's id, ttl, type and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Identifier usable with `update_record` / `delete_record`.
    pub id: String,
    /// Record type (`"A"`, `"TXT"`, ...).
    #[serde(rename = "type")]
    pub rtype: String,
    /// Fully qualified name with trailing dot.
    pub name: String,
    /// Decoded content (TXT unquoted, CNAME absolute where the vendor stores it so).
    pub content: String,
    /// Time to live in seconds, if the vendor reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// A vendor record set: all values sharing one name and type under one ttl.
///
/// `values` hold the vendor's transport form (quoted TXT and so on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Vendor id of the set, when the vendor has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name as returned by the vendor (relative or absolute).
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub rtype: String,
    /// Shared time to live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Raw values, in vendor order.
    pub values: Vec<String>,
}

/// Snapshot of a zone at one point in time.
///
/// Only ever cached inside a single provider instance and discarded after
/// every mutation that instance performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Domain the zone serves.
    pub domain: String,
    /// Vendor zone id.
    pub domain_id: String,
    /// Record sets (flat vendors use one single-value set per record).
    pub rrsets: Vec<RecordSet>,
}

/// AND-combined optional filter for `list_records`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Only records of this type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rtype: Option<String>,
    /// Only records with this name (any form, normalized before comparison).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Only records with this decoded content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RecordFilter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from optional parts.
    pub fn new(rtype: Option<&str>, name: Option<&str>, content: Option<&str>) -> Self {
        Self {
            rtype: rtype.map(str::to_uppercase),
            name: name.map(ToString::to_string),
            content: content.map(ToString::to_string),
        }
    }
}

/// Locates the record(s) an update or delete applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "camelCase")]
pub enum RecordSelector {
    /// An identifier previously returned by `list_records`.
    ByIdentifier {
        /// The identifier.
        identifier: String,
    },
    /// A record type and name, optionally narrowed to one content value.
    ByTypeName {
        /// Record type.
        rtype: String,
        /// Record name in any form.
        name: String,
        /// Content to narrow to; `None` addresses every value.
        content: Option<String>,
    },
}

impl RecordSelector {
    /// Validates the loose `(identifier?, rtype?, name?, content?)` argument
    /// combination once. An identifier wins; otherwise both type and name are
    /// required.
    pub fn from_parts(
        identifier: Option<&str>,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Self> {
        Self::build("select_record", identifier, rtype, name, content)
    }

    fn build(
        operation: &str,
        identifier: Option<&str>,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Self> {
        if let Some(identifier) = identifier.filter(|id| !id.trim().is_empty()) {
            return Ok(Self::ByIdentifier {
                identifier: identifier.to_string(),
            });
        }
        match (non_blank(rtype), non_blank(name)) {
            (Some(rtype), Some(name)) => Ok(Self::ByTypeName {
                rtype: rtype.to_uppercase(),
                name: name.to_string(),
                content: content.map(ToString::to_string),
            }),
            (None, _) => Err(ProviderError::InvalidArguments {
                operation: operation.to_string(),
                detail: "either an identifier or a record type and name are required; type is missing"
                    .to_string(),
            }),
            (_, None) => Err(ProviderError::InvalidArguments {
                operation: operation.to_string(),
                detail: "either an identifier or a record type and name are required; name is missing"
                    .to_string(),
            }),
        }
    }

    /// Short description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::ByIdentifier { identifier } => format!("id {identifier}"),
            Self::ByTypeName {
                rtype,
                name,
                content: Some(content),
            } => format!("{rtype} {name} {content}"),
            Self::ByTypeName { rtype, name, .. } => format!("{rtype} {name}"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Request to change an existing record.
///
/// `target` locates the record; the remaining fields carry the new values,
/// falling back to the target's current values where `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    /// Record to update.
    pub target: RecordSelector,
    /// New record type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rtype: Option<String>,
    /// New record name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateRecordRequest {
    /// Validates the loose `(identifier?, rtype?, name?, content?)` argument
    /// combination once.
    ///
    /// With an identifier, `rtype`/`name`/`content` are the new values. Without
    /// one, `rtype` and `name` locate the record and `content` is the new value.
    pub fn from_parts(
        identifier: Option<&str>,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Self> {
        let target = RecordSelector::build("update_record", identifier, rtype, name, None)?;
        Ok(Self {
            target,
            rtype: non_blank(rtype).map(str::to_uppercase),
            name: non_blank(name).map(ToString::to_string),
            content: content.map(ToString::to_string),
        })
    }
}

// ============ Lifecycle ============

/// Lifecycle of a provider instance. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    /// Constructed, domain not yet resolved.
    Uninitialized,
    /// Domain id resolved, no record operation issued yet.
    Authenticated,
    /// At least one record operation issued.
    Operating,
    /// `cleanup()` ran; the instance is spent.
    Released,
}

impl std::fmt::Display for ProviderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Operating => write!(f, "operating"),
            Self::Released => write!(f, "released"),
        }
    }
}

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Hetzner Cloud DNS. Requires feature `hetzner`.
    #[cfg(feature = "hetzner")]
    Hetzner,
    /// DevNomads DNS (PowerDNS based). Requires feature `devnomads`.
    #[cfg(feature = "devnomads")]
    Devnomads,
    /// Scaleway Domains and DNS. Requires feature `scaleway`.
    #[cfg(feature = "scaleway")]
    Scaleway,
}

impl ProviderType {
    /// Every provider enabled in this build.
    pub fn all() -> Vec<Self> {
        vec![
            #[cfg(feature = "hetzner")]
            Self::Hetzner,
            #[cfg(feature = "devnomads")]
            Self::Devnomads,
            #[cfg(feature = "scaleway")]
            Self::Scaleway,
        ]
    }

    /// Registry key of the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "hetzner")]
            Self::Hetzner => "hetzner",
            #[cfg(feature = "devnomads")]
            Self::Devnomads => "devnomads",
            #[cfg(feature = "scaleway")]
            Self::Scaleway => "scaleway",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ProviderError::InvalidArguments {
                operation: "create_provider".to_string(),
                detail: format!("unknown or disabled provider '{s}'"),
            })
    }
}

// ============ Provider Metadata Types ============

/// Input field type for a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked input.
    Password,
}

/// Describes one credential field a provider needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Key used in [`ProviderCredentials::from_map`].
    pub key: String,
    /// Human readable label.
    pub label: String,
    /// Input type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static description of a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Registry key.
    pub id: ProviderType,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Credential fields.
    pub required_fields: Vec<ProviderCredentialField>,
    /// Authoritative nameservers of the vendor.
    pub nameservers: Vec<String>,
    /// Whether updates replace content in place (`true`) or delete then create (`false`).
    pub atomic_update: bool,
}

// ============ Credential Types ============

/// Credential validation failure.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// Field absent from the input map.
    #[error("Missing required field: {label}")]
    MissingField {
        /// Provider being configured.
        provider: ProviderType,
        /// Field key.
        field: String,
        /// Field label.
        label: String,
    },
    /// Field present but blank.
    #[error("Field must not be empty: {label}")]
    EmptyField {
        /// Provider being configured.
        provider: ProviderType,
        /// Field key.
        field: String,
        /// Field label.
        label: String,
    },
}

impl From<CredentialValidationError> for ProviderError {
    fn from(err: CredentialValidationError) -> Self {
        let provider = match &err {
            CredentialValidationError::MissingField { provider, .. }
            | CredentialValidationError::EmptyField { provider, .. } => *provider,
        };
        Self::InvalidCredentials {
            provider: provider.to_string(),
            raw_message: Some(err.to_string()),
        }
    }
}

/// Provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Hetzner Cloud API token (bearer).
    #[cfg(feature = "hetzner")]
    #[serde(rename = "hetzner")]
    Hetzner {
        /// API token.
        auth_token: String,
    },

    /// DevNomads API token (bearer).
    #[cfg(feature = "devnomads")]
    #[serde(rename = "devnomads")]
    Devnomads {
        /// API token.
        auth_token: String,
    },

    /// Scaleway secret key (`X-Auth-Token` header).
    #[cfg(feature = "scaleway")]
    #[serde(rename = "scaleway")]
    Scaleway {
        /// Secret key.
        auth_secret_key: String,
    },
}

impl ProviderCredentials {
    /// Builds credentials from a key/value map, validating required fields.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> std::result::Result<Self, CredentialValidationError> {
        match provider {
            #[cfg(feature = "hetzner")]
            ProviderType::Hetzner => Ok(Self::Hetzner {
                auth_token: Self::get_required_field(provider, map, "authToken", "API Token")?,
            }),
            #[cfg(feature = "devnomads")]
            ProviderType::Devnomads => Ok(Self::Devnomads {
                auth_token: Self::get_required_field(provider, map, "authToken", "API Token")?,
            }),
            #[cfg(feature = "scaleway")]
            ProviderType::Scaleway => Ok(Self::Scaleway {
                auth_secret_key: Self::get_required_field(
                    provider,
                    map,
                    "authSecretKey",
                    "Secret Key",
                )?,
            }),
        }
    }

    fn get_required_field(
        provider: ProviderType,
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> std::result::Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider,
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }

    /// Converts back into a key/value map.
    pub fn to_map(&self) -> HashMap<String, String> {
        match self {
            #[cfg(feature = "hetzner")]
            Self::Hetzner { auth_token } => [("authToken".to_string(), auth_token.clone())].into(),
            #[cfg(feature = "devnomads")]
            Self::Devnomads { auth_token } => {
                [("authToken".to_string(), auth_token.clone())].into()
            }
            #[cfg(feature = "scaleway")]
            Self::Scaleway { auth_secret_key } => {
                [("authSecretKey".to_string(), auth_secret_key.clone())].into()
            }
        }
    }

    /// Provider these credentials belong to.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "hetzner")]
            Self::Hetzner { .. } => ProviderType::Hetzner,
            #[cfg(feature = "devnomads")]
            Self::Devnomads { .. } => ProviderType::Devnomads,
            #[cfg(feature = "scaleway")]
            Self::Scaleway { .. } => ProviderType::Scaleway,
        }
    }
}

// ============ Options & Config ============

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Options shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOptions {
    /// TTL applied to created record sets and to updates. `None` keeps the
    /// vendor default on create and the current ttl on update.
    pub ttl: Option<u32>,
    /// Override of the vendor API base URL.
    pub api_endpoint: Option<String>,
    /// Transport connect timeout.
    pub connect_timeout_secs: u64,
    /// Transport request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            api_endpoint: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Everything needed to construct a provider for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Domain (zone apex) to manage.
    pub domain: String,
    /// Provider credentials; also select the provider.
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
    /// Shared options.
    #[serde(default)]
    pub options: ProviderOptions,
}
