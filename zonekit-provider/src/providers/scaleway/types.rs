//! Scaleway Domains and DNS wire types

use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::null_as_default;

#[derive(Debug, Deserialize)]
pub struct ScalewayRecordList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<ScalewayRecord>,
    #[serde(default)]
    pub total_count: u32,
}

/// One record. `name` is zone-relative, empty for the apex.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScalewayRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    #[serde(default)]
    pub ttl: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    pub name: String,
    pub data: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
}

/// One entry of `changes`, serialized as `{"add": {...}}`, `{"delete": {...}}`
/// or `{"set": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordChange {
    Add { records: Vec<NewRecord> },
    Delete { id: String },
    Set { id: String, records: Vec<NewRecord> },
}

#[derive(Debug, Serialize)]
pub struct PatchRecordsBody {
    pub changes: Vec<RecordChange>,
}

/// Error payload: `{"message": "...", "type": "..."}`
#[derive(Debug, Deserialize)]
pub struct ScalewayErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
