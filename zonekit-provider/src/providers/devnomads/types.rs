//! PowerDNS wire types

use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::null_as_default;

/// `GET /zones/{zone}` response. Names are absolute with trailing dot.
#[derive(Debug, Clone, Deserialize)]
pub struct PdnsZone {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rrsets: Vec<PdnsRrset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdnsRrset {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<PdnsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Replace,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchRrset {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub changetype: ChangeType,
    pub records: Vec<PdnsRecord>,
}

#[derive(Debug, Serialize)]
pub struct PatchZoneBody {
    pub rrsets: Vec<PatchRrset>,
}

/// Error payload: `{"error": "...", "errors": ["..."]}`
#[derive(Debug, Deserialize)]
pub struct PdnsErrorResponse {
    pub error: String,
    #[serde(default)]
    pub errors: Vec<String>,
}
