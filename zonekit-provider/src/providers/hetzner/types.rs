//! Hetzner Cloud DNS wire types

use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::{null_as_default, string_or_number};

#[derive(Debug, Deserialize)]
pub struct HetznerZoneResponse {
    pub zone: HetznerZone,
}

#[derive(Debug, Deserialize)]
pub struct HetznerZone {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HetznerRrsetList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rrsets: Vec<HetznerRrset>,
    #[serde(default)]
    pub meta: Option<HetznerMeta>,
}

#[derive(Debug, Deserialize)]
pub struct HetznerMeta {
    pub pagination: Option<HetznerPagination>,
}

#[derive(Debug, Deserialize)]
pub struct HetznerPagination {
    pub next_page: Option<u32>,
}

/// One rrset. `name` is zone-relative, `@` for the apex.
#[derive(Debug, Clone, Deserialize)]
pub struct HetznerRrset {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<HetznerRrsetRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HetznerRrsetRecord {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRrsetBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub records: Vec<HetznerRrsetRecord>,
}

/// Body of `actions/add_records`.
#[derive(Debug, Serialize)]
pub struct AddRecordsBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub records: Vec<HetznerRrsetRecord>,
}

/// Body of `actions/set_records`.
#[derive(Debug, Serialize)]
pub struct SetRecordsBody {
    pub records: Vec<HetznerRrsetRecord>,
}

/// Body of `actions/change_ttl`.
#[derive(Debug, Serialize)]
pub struct ChangeTtlBody {
    pub ttl: u32,
}

/// Error payload: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct HetznerErrorResponse {
    pub error: HetznerErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct HetznerErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}
