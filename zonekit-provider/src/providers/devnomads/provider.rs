//! DevNomads DnsProvider trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::rrset::{Reconciler, RecordSetChange};
use crate::traits::{DnsProvider, ProviderErrorMapper};
use crate::types::{
    FieldType, ProviderCredentialField, ProviderMetadata, ProviderState, ProviderType, Record,
    RecordFilter, RecordSelector, RecordSet, UpdateRecordRequest,
};
use crate::utils::content::ContentCodec;
use crate::utils::identifier::{self, RecordKey};
use crate::utils::names::{full_name, names_match};

use super::types::{ChangeType, PatchRrset};
use super::{DEFAULT_TTL, DevnomadsProvider, PdnsRecord, PdnsRrset, PdnsZone};

const CODEC: ContentCodec = ContentCodec::POWERDNS;

/// The record an update replaces, with what the replacement inherits.
#[derive(Debug, Clone)]
struct UpdateSource {
    key: RecordKey,
    ttl: Option<u32>,
    disabled: bool,
}

impl DevnomadsProvider {
    pub(crate) fn rrset_to_set(rrset: &PdnsRrset) -> RecordSet {
        RecordSet {
            id: None,
            name: rrset.name.clone(),
            rtype: rrset.record_type.clone(),
            ttl: rrset.ttl,
            values: rrset.records.iter().map(|r| r.content.clone()).collect(),
        }
    }

    fn sets(zone: &PdnsZone) -> Vec<RecordSet> {
        zone.rrsets.iter().map(Self::rrset_to_set).collect()
    }

    /// Build the PATCH rrset for a planned change, keeping the `disabled`
    /// flag of every value that already existed.
    pub(crate) fn to_patch(
        domain: &str,
        zone: &PdnsZone,
        change: RecordSetChange,
    ) -> Option<PatchRrset> {
        let (set, changetype) = match change {
            RecordSetChange::Unchanged => return None,
            RecordSetChange::Delete(set) => (set, ChangeType::Delete),
            RecordSetChange::Create(set)
            | RecordSetChange::Replace(set)
            | RecordSetChange::Append { set, .. } => (set, ChangeType::Replace),
        };

        let name = full_name(domain, &set.name);
        if changetype == ChangeType::Delete {
            return Some(PatchRrset {
                name,
                record_type: set.rtype,
                ttl: None,
                changetype,
                records: Vec::new(),
            });
        }

        let current = zone
            .rrsets
            .iter()
            .find(|r| r.record_type == set.rtype && full_name(domain, &r.name) == name);
        let records = set
            .values
            .into_iter()
            .map(|content| {
                let disabled = current
                    .and_then(|r| r.records.iter().find(|v| v.content == content))
                    .is_some_and(|v| v.disabled);
                PdnsRecord { content, disabled }
            })
            .collect();

        Some(PatchRrset {
            name,
            record_type: set.rtype,
            ttl: Some(set.ttl.unwrap_or(DEFAULT_TTL)),
            changetype,
            records,
        })
    }

    fn decode_identifier(&self, identifier: &str) -> Result<RecordKey> {
        identifier::decode(identifier).ok_or_else(|| ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: "identifier".to_string(),
            detail: format!("'{identifier}' is not of the form type/name=content"),
        })
    }

    async fn load_zone(&mut self) -> Result<PdnsZone> {
        if let Some(zone) = self.session.snapshot() {
            return Ok(zone);
        }
        let zone = self.get_zone().await?;
        self.session.store(zone.clone());
        Ok(zone)
    }

    async fn send(&mut self, zone: &PdnsZone, change: RecordSetChange) -> Result<bool> {
        let domain = self.session.domain().to_string();
        match Self::to_patch(&domain, zone, change) {
            None => Ok(false),
            Some(rrset) => {
                self.patch_rrset(rrset).await?;
                self.session.invalidate();
                Ok(true)
            }
        }
    }

    /// Add one value. `carried` supplies the ttl and `disabled` flag of a
    /// replaced record; the ttl is only used when a new rrset is created.
    async fn add_value(
        &mut self,
        rtype: &str,
        name: &str,
        content: &str,
        carried: Option<&UpdateSource>,
    ) -> Result<()> {
        let zone = self.load_zone().await?;
        let domain = self.session.domain().to_string();
        let reconciler = Reconciler::new(&domain, CODEC);
        let sets = Self::sets(&zone);
        let existing = reconciler.find(&sets, rtype, name);
        let ttl = match (self.ttl, existing, carried) {
            (Some(ttl), _, _) => Some(ttl),
            (None, None, Some(old)) => old.ttl,
            _ => None,
        };
        let change = reconciler.plan_create(existing, rtype, &full_name(&domain, name), content, ttl);

        let Some(mut patch) = Self::to_patch(&domain, &zone, change) else {
            log::info!("[devnomads] record {rtype} {name} {content} already exists");
            return Ok(());
        };
        if carried.is_some_and(|old| old.disabled) {
            let encoded = CODEC.encode(&domain, rtype, content);
            for record in patch.records.iter_mut().filter(|r| r.content == encoded) {
                record.disabled = true;
            }
        }
        self.patch_rrset(patch).await?;
        self.session.invalidate();
        Ok(())
    }

    async fn remove_values(&mut self, rtype: &str, name: &str, content: Option<&str>) -> Result<bool> {
        let zone = self.load_zone().await?;
        let domain = self.session.domain().to_string();
        let reconciler = Reconciler::new(&domain, CODEC);
        let change = reconciler.plan_delete(reconciler.find(&Self::sets(&zone), rtype, name), content);
        self.send(&zone, change).await
    }

    /// Resolve the single record an update replaces.
    async fn update_source(&mut self, target: &RecordSelector) -> Result<UpdateSource> {
        let zone = self.load_zone().await?;
        let domain = self.session.domain().to_string();
        let reconciler = Reconciler::new(&domain, CODEC);

        let (rtype, name, content) = match target {
            RecordSelector::ByIdentifier { identifier } => {
                let key = self.decode_identifier(identifier)?;
                (key.rtype, key.name, Some(key.content))
            }
            RecordSelector::ByTypeName {
                rtype,
                name,
                content,
            } => (rtype.clone(), name.clone(), content.clone()),
        };

        let rrset = zone.rrsets.iter().find(|r| {
            r.record_type.eq_ignore_ascii_case(&rtype) && names_match(&domain, &r.name, &name)
        });
        let candidates: Vec<&PdnsRecord> = rrset
            .map(|r| {
                r.records
                    .iter()
                    .filter(|v| {
                        content
                            .as_deref()
                            .is_none_or(|c| reconciler.value_matches(&rtype, &v.content, c))
                    })
                    .collect()
            })
            .unwrap_or_default();

        match candidates.as_slice() {
            [record] => Ok(UpdateSource {
                key: RecordKey {
                    content: CODEC.decode(&domain, &rtype, &record.content),
                    name: full_name(&domain, &name),
                    rtype,
                },
                ttl: rrset.and_then(|r| r.ttl),
                disabled: record.disabled,
            }),
            [] => Err(ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: target.describe(),
                raw_message: None,
            }),
            many => Err(ProviderError::AmbiguousRecord {
                provider: self.provider_name().to_string(),
                selector: target.describe(),
                candidates: many.len(),
            }),
        }
    }
}

#[async_trait]
impl DnsProvider for DevnomadsProvider {
    fn id(&self) -> &'static str {
        "devnomads"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Devnomads,
            name: "DevNomads".to_string(),
            description: "PowerDNS based DNS hosting by DevNomads".to_string(),
            required_fields: vec![ProviderCredentialField {
                key: "authToken".to_string(),
                label: "API Token".to_string(),
                field_type: FieldType::Password,
                help_text: None,
            }],
            nameservers: Vec::new(),
            atomic_update: false,
        }
    }

    fn nameservers(&self) -> Vec<String> {
        Vec::new()
    }

    fn domain(&self) -> &str {
        self.session.domain()
    }

    fn state(&self) -> ProviderState {
        self.session.state()
    }

    async fn authenticate(&mut self) -> Result<()> {
        self.session.require_authenticatable()?;
        self.client.require_credentials()?;
        let zone = self.get_zone().await?;
        log::info!(
            "[devnomads] authenticated for zone {} ({} rrsets)",
            zone.name,
            zone.rrsets.len()
        );
        let domain = self.session.domain().to_string();
        self.session.authenticated(domain);
        self.session.store(zone);
        Ok(())
    }

    async fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>> {
        self.session.enter_operation("list_records")?;
        let zone = self.load_zone().await?;
        let domain = self.session.domain().to_string();
        let reconciler = Reconciler::new(&domain, CODEC);
        let records = reconciler.flatten(&Self::sets(&zone), |set, content| {
            identifier::encode(&set.rtype, &full_name(&domain, &set.name), content)
        });
        Ok(reconciler.filter(records, filter))
    }

    async fn create_record(&mut self, rtype: &str, name: &str, content: &str) -> Result<bool> {
        self.session.enter_operation("create_record")?;
        self.add_value(&rtype.to_uppercase(), name, content, None).await?;
        Ok(true)
    }

    /// Delete then create. A failure between the two steps loses the old
    /// record; it is logged and the error returned, nothing is restored.
    async fn update_record(&mut self, req: &UpdateRecordRequest) -> Result<bool> {
        self.session.enter_operation("update_record")?;
        let source = self.update_source(&req.target).await?;
        let old = &source.key;

        let rtype = req.rtype.clone().unwrap_or_else(|| old.rtype.clone());
        let name = req.name.clone().unwrap_or_else(|| old.name.clone());
        let content = req.content.clone().unwrap_or_else(|| old.content.clone());

        let domain = self.session.domain().to_string();
        if rtype.eq_ignore_ascii_case(&old.rtype)
            && full_name(&domain, &name) == old.name
            && CODEC.canonical(&domain, &rtype, &content) == old.content
        {
            log::info!("[devnomads] {} unchanged", req.target.describe());
            return Ok(true);
        }

        self.remove_values(&old.rtype, &old.name, Some(&old.content))
            .await?;
        if let Err(err) = self.add_value(&rtype, &name, &content, Some(&source)).await {
            log::error!(
                "[devnomads] update deleted {} {} {} but creating {rtype} {name} {content} failed; the old record is lost: {err}",
                old.rtype,
                old.name,
                old.content
            );
            return Err(err);
        }
        Ok(true)
    }

    async fn delete_record(&mut self, selector: &RecordSelector) -> Result<bool> {
        self.session.enter_operation("delete_record")?;
        let (rtype, name, content) = match selector {
            RecordSelector::ByIdentifier { identifier } => {
                let key = self.decode_identifier(identifier)?;
                (key.rtype, key.name, Some(key.content))
            }
            RecordSelector::ByTypeName {
                rtype,
                name,
                content,
            } => (rtype.clone(), name.clone(), content.clone()),
        };

        if !self.remove_values(&rtype, &name, content.as_deref()).await? {
            log::info!("[devnomads] nothing to delete for {}", selector.describe());
        }
        Ok(true)
    }

    async fn cleanup(&mut self) -> Result<()> {
        self.session.release();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "example.nl";

    const ZONE: &str = r#"{
        "id": "example.nl.",
        "name": "example.nl.",
        "kind": "Native",
        "rrsets": [
            {
                "name": "www.example.nl.",
                "type": "A",
                "ttl": 300,
                "records": [
                    {"content": "1.1.1.1", "disabled": false},
                    {"content": "3.3.3.3", "disabled": true}
                ],
                "comments": []
            },
            {
                "name": "_acme-challenge.example.nl.",
                "type": "TXT",
                "ttl": 3600,
                "records": [{"content": "\"token=abc/def\"", "disabled": false}]
            },
            {
                "name": "alias.example.nl.",
                "type": "CNAME",
                "ttl": 3600,
                "records": [{"content": "www.example.nl.", "disabled": false}]
            }
        ]
    }"#;

    fn zone() -> PdnsZone {
        serde_json::from_str(ZONE).unwrap()
    }

    fn records() -> Vec<Record> {
        let reconciler = Reconciler::new(DOMAIN, CODEC);
        reconciler.flatten(&DevnomadsProvider::sets(&zone()), |set, content| {
            identifier::encode(&set.rtype, &full_name(DOMAIN, &set.name), content)
        })
    }

    #[test]
    fn identifiers_are_composite_and_decoded() {
        let records = records();
        let txt = records.iter().find(|r| r.rtype == "TXT").unwrap();
        assert_eq!(txt.content, "token=abc/def");
        assert_eq!(txt.id, "TXT/_acme-challenge.example.nl.=token=abc/def");

        let key = identifier::decode(&txt.id).unwrap();
        assert_eq!(key.content, "token=abc/def");
        assert_eq!(key.name, "_acme-challenge.example.nl.");
    }

    #[test]
    fn append_keeps_ttl_and_disabled_flags() {
        let zone = zone();
        let reconciler = Reconciler::new(DOMAIN, CODEC);
        let sets = DevnomadsProvider::sets(&zone);
        let change = reconciler.plan_create(
            reconciler.find(&sets, "A", "www"),
            "A",
            "www.example.nl.",
            "2.2.2.2",
            None,
        );
        let patch = DevnomadsProvider::to_patch(DOMAIN, &zone, change).unwrap();
        assert_eq!(patch.changetype, ChangeType::Replace);
        assert_eq!(patch.ttl, Some(300));
        assert_eq!(
            patch.records,
            vec![
                PdnsRecord { content: "1.1.1.1".to_string(), disabled: false },
                PdnsRecord { content: "3.3.3.3".to_string(), disabled: true },
                PdnsRecord { content: "2.2.2.2".to_string(), disabled: false },
            ]
        );
    }

    #[test]
    fn new_rrset_uses_default_ttl_and_quotes_txt() {
        let zone = zone();
        let reconciler = Reconciler::new(DOMAIN, CODEC);
        let change = reconciler.plan_create(None, "TXT", "new.example.nl.", "hello world", None);
        let patch = DevnomadsProvider::to_patch(DOMAIN, &zone, change).unwrap();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "new.example.nl.",
                "type": "TXT",
                "ttl": 600,
                "changetype": "REPLACE",
                "records": [{"content": "\"hello world\"", "disabled": false}]
            })
        );
    }

    #[test]
    fn removing_last_value_deletes_rrset() {
        let zone = zone();
        let reconciler = Reconciler::new(DOMAIN, CODEC);
        let sets = DevnomadsProvider::sets(&zone);
        let change = reconciler.plan_delete(
            reconciler.find(&sets, "CNAME", "alias"),
            Some("www.example.nl."),
        );
        let patch = DevnomadsProvider::to_patch(DOMAIN, &zone, change).unwrap();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "alias.example.nl.",
                "type": "CNAME",
                "changetype": "DELETE",
                "records": []
            })
        );
    }

    #[test]
    fn relative_cname_target_matches_stored_absolute() {
        let zone = zone();
        let reconciler = Reconciler::new(DOMAIN, CODEC);
        let sets = DevnomadsProvider::sets(&zone);
        let change = reconciler.plan_create(
            reconciler.find(&sets, "CNAME", "alias"),
            "CNAME",
            "alias.example.nl.",
            "www",
            None,
        );
        assert!(DevnomadsProvider::to_patch(DOMAIN, &zone, change).is_none());
    }

    #[test]
    fn malformed_identifier_is_rejected() {
        let p = DevnomadsProvider::new(DOMAIN, "t".to_string(), &crate::types::ProviderOptions::default());
        let err = p.decode_identifier("no-delimiters").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidParameter { ref param, .. } if param == "identifier"));
    }

    #[tokio::test]
    async fn record_operations_before_authenticate_fail() {
        let mut p = DevnomadsProvider::new(DOMAIN, "t".to_string(), &crate::types::ProviderOptions::default());
        let err = p.list_records(&RecordFilter::all()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState { .. }));
        p.cleanup().await.unwrap();
        assert_eq!(p.state(), ProviderState::Released);
    }

    #[tokio::test]
    async fn blank_token_fails_before_any_request() {
        let mut p = DevnomadsProvider::new(DOMAIN, "  ".to_string(), &crate::types::ProviderOptions::default());
        let err = p.authenticate().await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
        assert_eq!(p.state(), ProviderState::Uninitialized);
    }

    // ============ Request sequences ============

    use crate::test_utils::CannedServer;
    use serde_json::{Value, json};

    const ZONE_PATH: &str = "/zones/example.nl.";

    fn zone_reply(rrsets: Value) -> (u16, Value) {
        (200, json!({"id": "example.nl.", "name": "example.nl.", "rrsets": rrsets}))
    }

    fn www_a(ttl: u32, records: Value) -> Value {
        json!([{"name": "www.example.nl.", "type": "A", "ttl": ttl, "records": records}])
    }

    async fn provider(server: &CannedServer) -> DevnomadsProvider {
        let mut p = DevnomadsProvider::new(DOMAIN, "token".to_string(), &server.options(None));
        p.authenticate().await.unwrap();
        p
    }

    #[tokio::test]
    async fn update_recreates_with_old_ttl_and_flag() {
        let server = CannedServer::start(vec![
            zone_reply(www_a(3600, json!([{"content": "1.1.1.1", "disabled": true}]))),
            (204, Value::Null),
            zone_reply(json!([])),
            (204, Value::Null),
            zone_reply(www_a(3600, json!([{"content": "2.2.2.2", "disabled": true}]))),
        ])
        .await;
        let mut p = provider(&server).await;

        let req = UpdateRecordRequest::from_parts(None, Some("A"), Some("www"), Some("2.2.2.2")).unwrap();
        assert!(p.update_record(&req).await.unwrap());

        let records = p
            .list_records(&RecordFilter::new(Some("A"), Some("www"), None))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "2.2.2.2");
        assert_eq!(records[0].id, "A/www.example.nl.=2.2.2.2");

        assert_eq!(
            server.lines(),
            vec![
                format!("GET {ZONE_PATH}"),
                format!("PATCH {ZONE_PATH}"),
                format!("GET {ZONE_PATH}"),
                format!("PATCH {ZONE_PATH}"),
                format!("GET {ZONE_PATH}"),
            ]
        );
        let received = server.received();
        assert_eq!(
            received[1].body,
            Some(json!({"rrsets": [{
                "name": "www.example.nl.",
                "type": "A",
                "changetype": "DELETE",
                "records": []
            }]}))
        );
        assert_eq!(
            received[3].body,
            Some(json!({"rrsets": [{
                "name": "www.example.nl.",
                "type": "A",
                "ttl": 3600,
                "changetype": "REPLACE",
                "records": [{"content": "2.2.2.2", "disabled": true}]
            }]}))
        );
    }

    #[tokio::test]
    async fn update_into_existing_rrset_keeps_its_ttl() {
        let server = CannedServer::start(vec![
            zone_reply(www_a(300, json!([
                {"content": "1.1.1.1", "disabled": false},
                {"content": "3.3.3.3", "disabled": false}
            ]))),
            (204, Value::Null),
            zone_reply(www_a(300, json!([{"content": "3.3.3.3", "disabled": false}]))),
            (204, Value::Null),
        ])
        .await;
        let mut p = provider(&server).await;

        let req = UpdateRecordRequest::from_parts(
            Some("A/www.example.nl.=1.1.1.1"),
            None,
            None,
            Some("2.2.2.2"),
        )
        .unwrap();
        assert!(p.update_record(&req).await.unwrap());

        let received = server.received();
        assert_eq!(received.len(), 4);
        assert_eq!(
            received[1].body,
            Some(json!({"rrsets": [{
                "name": "www.example.nl.",
                "type": "A",
                "ttl": 300,
                "changetype": "REPLACE",
                "records": [{"content": "3.3.3.3", "disabled": false}]
            }]}))
        );
        assert_eq!(
            received[3].body,
            Some(json!({"rrsets": [{
                "name": "www.example.nl.",
                "type": "A",
                "ttl": 300,
                "changetype": "REPLACE",
                "records": [
                    {"content": "3.3.3.3", "disabled": false},
                    {"content": "2.2.2.2", "disabled": false}
                ]
            }]}))
        );
    }

    #[tokio::test]
    async fn failed_create_after_delete_is_returned() {
        let server = CannedServer::start(vec![
            zone_reply(www_a(300, json!([{"content": "1.1.1.1", "disabled": false}]))),
            (204, Value::Null),
            zone_reply(json!([])),
            (500, json!({"error": "backend unavailable"})),
        ])
        .await;
        let mut p = provider(&server).await;

        let req = UpdateRecordRequest::from_parts(None, Some("A"), Some("www"), Some("2.2.2.2")).unwrap();
        let err = p.update_record(&req).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { status: 500, .. }), "{err:?}");
        assert!(server.exhausted());
    }

    #[tokio::test]
    async fn update_needs_a_single_candidate() {
        let server = CannedServer::start(vec![zone_reply(www_a(
            300,
            json!([
                {"content": "1.1.1.1", "disabled": false},
                {"content": "3.3.3.3", "disabled": false}
            ]),
        ))])
        .await;
        let mut p = provider(&server).await;

        let req = UpdateRecordRequest::from_parts(None, Some("A"), Some("www"), Some("2.2.2.2")).unwrap();
        let err = p.update_record(&req).await.unwrap_err();
        assert!(matches!(err, ProviderError::AmbiguousRecord { candidates: 2, .. }), "{err:?}");

        let req = UpdateRecordRequest::from_parts(None, Some("A"), Some("mail"), Some("2.2.2.2")).unwrap();
        let err = p.update_record(&req).await.unwrap_err();
        assert!(matches!(err, ProviderError::RecordNotFound { .. }), "{err:?}");
        assert_eq!(server.received().len(), 1);
    }

    #[tokio::test]
    async fn create_is_sent_once() {
        let server = CannedServer::start(vec![
            zone_reply(www_a(300, json!([{"content": "1.1.1.1", "disabled": false}]))),
            (204, Value::Null),
            zone_reply(www_a(300, json!([
                {"content": "1.1.1.1", "disabled": false},
                {"content": "2.2.2.2", "disabled": false}
            ]))),
        ])
        .await;
        let mut p = provider(&server).await;

        assert!(p.create_record("A", "www", "1.1.1.1").await.unwrap());
        assert!(p.create_record("A", "www", "2.2.2.2").await.unwrap());
        assert!(p.create_record("a", "www.example.nl.", "2.2.2.2").await.unwrap());

        assert_eq!(
            server.lines(),
            vec![
                format!("GET {ZONE_PATH}"),
                format!("PATCH {ZONE_PATH}"),
                format!("GET {ZONE_PATH}"),
            ]
        );
    }
}
