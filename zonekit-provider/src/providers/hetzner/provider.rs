//! Hetzner DnsProvider trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::rrset::{Reconciler, RecordSetChange};
use crate::traits::{DnsProvider, ProviderErrorMapper};
use crate::types::{
    FieldType, ProviderCredentialField, ProviderMetadata, ProviderState, ProviderType, Record,
    RecordFilter, RecordSelector, RecordSet, UpdateRecordRequest, Zone,
};
use crate::utils::content::ContentCodec;
use crate::utils::names::{names_match, relative_name};

use super::types::{AddRecordsBody, ChangeTtlBody, CreateRrsetBody, SetRecordsBody};
use super::{HetznerProvider, HetznerRrset, HetznerRrsetRecord};

const CODEC: ContentCodec = ContentCodec::QUOTED_TXT_ABSOLUTE_CNAME;

impl HetznerProvider {
    /// Convert a Hetzner rrset into a [`RecordSet`]. The rrset id (`name/TYPE`)
    /// becomes the identifier of every record in it.
    pub(crate) fn rrset_to_set(rrset: HetznerRrset) -> RecordSet {
        let id = rrset
            .id
            .unwrap_or_else(|| format!("{}/{}", rrset.name, rrset.record_type));
        RecordSet {
            id: Some(id),
            name: rrset.name,
            rtype: rrset.record_type,
            ttl: rrset.ttl,
            values: rrset.records.into_iter().map(|r| r.value).collect(),
        }
    }

    fn to_wire(values: &[String]) -> Vec<HetznerRrsetRecord> {
        values
            .iter()
            .map(|value| HetznerRrsetRecord {
                value: value.clone(),
            })
            .collect()
    }

    async fn load_zone(&mut self, zone_id: &str) -> Result<Zone> {
        if let Some(zone) = self.session.snapshot() {
            return Ok(zone);
        }
        let rrsets = self
            .fetch_rrsets(zone_id)
            .await?
            .into_iter()
            .map(Self::rrset_to_set)
            .collect();
        let zone = Zone {
            domain: self.session.domain().to_string(),
            domain_id: zone_id.to_string(),
            rrsets,
        };
        self.session.store(zone.clone());
        Ok(zone)
    }

    /// Send the request(s) for one planned change. Returns whether anything
    /// was sent; the snapshot is dropped as soon as the server accepted it.
    async fn apply(&mut self, zone_id: &str, change: RecordSetChange) -> Result<bool> {
        match change {
            RecordSetChange::Unchanged => return Ok(false),
            RecordSetChange::Create(set) => {
                let body = CreateRrsetBody {
                    name: &set.name,
                    record_type: &set.rtype,
                    ttl: set.ttl,
                    records: Self::to_wire(&set.values),
                };
                self.create_rrset(zone_id, &body).await?;
            }
            RecordSetChange::Append { set, value } => {
                let body = AddRecordsBody {
                    ttl: self.ttl,
                    records: Self::to_wire(&[value]),
                };
                self.rrset_action(zone_id, &set.name, &set.rtype, "add_records", &body)
                    .await?;
            }
            RecordSetChange::Replace(set) => {
                let body = SetRecordsBody {
                    records: Self::to_wire(&set.values),
                };
                self.rrset_action(zone_id, &set.name, &set.rtype, "set_records", &body)
                    .await?;
            }
            RecordSetChange::Delete(set) => {
                // a 404 still means the cached set is gone
                let deleted = self.delete_rrset(zone_id, &set.name, &set.rtype).await?;
                self.session.invalidate();
                return Ok(deleted);
            }
        }
        self.session.invalidate();
        Ok(true)
    }

    fn find_by_id<'z>(zone: &'z Zone, identifier: &str) -> Option<&'z RecordSet> {
        zone.rrsets
            .iter()
            .find(|s| s.id.as_deref() == Some(identifier))
    }
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    fn id(&self) -> &'static str {
        "hetzner"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Hetzner,
            name: "Hetzner Cloud DNS".to_string(),
            description: "DNS zones managed through the Hetzner Cloud API".to_string(),
            required_fields: vec![ProviderCredentialField {
                key: "authToken".to_string(),
                label: "API Token".to_string(),
                field_type: FieldType::Password,
                help_text: Some(
                    "Read/write token of the Hetzner Console project owning the zone".to_string(),
                ),
            }],
            nameservers: vec!["ns.hetzner.com".to_string()],
            atomic_update: true,
        }
    }

    fn nameservers(&self) -> Vec<String> {
        vec!["ns.hetzner.com".to_string()]
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
        log::info!("[hetzner] authenticated for zone {}", zone.name);
        self.session.authenticated(zone.id);
        Ok(())
    }

    async fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>> {
        let zone_id = self.session.enter_operation("list_records")?;
        let zone = self.load_zone(&zone_id).await?;
        let reconciler = Reconciler::new(&zone.domain, CODEC);
        let records = reconciler.flatten(&zone.rrsets, |set, _| set.id.clone().unwrap_or_default());
        Ok(reconciler.filter(records, filter))
    }

    async fn create_record(&mut self, rtype: &str, name: &str, content: &str) -> Result<bool> {
        let zone_id = self.session.enter_operation("create_record")?;
        let zone = self.load_zone(&zone_id).await?;
        let rtype = rtype.to_uppercase();
        let reconciler = Reconciler::new(&zone.domain, CODEC);

        let existing = reconciler.find(&zone.rrsets, &rtype, name);
        let change = reconciler.plan_create(
            existing,
            &rtype,
            &relative_name(&zone.domain, name),
            content,
            self.ttl,
        );
        if change == RecordSetChange::Unchanged {
            log::info!("[hetzner] record {rtype} {name} {content} already exists");
            return Ok(true);
        }

        self.apply(&zone_id, change).await?;
        Ok(true)
    }

    async fn update_record(&mut self, req: &UpdateRecordRequest) -> Result<bool> {
        let zone_id = self.session.enter_operation("update_record")?;
        let zone = self.load_zone(&zone_id).await?;
        let reconciler = Reconciler::new(&zone.domain, CODEC);

        let target = match &req.target {
            RecordSelector::ByIdentifier { identifier } => Self::find_by_id(&zone, identifier),
            RecordSelector::ByTypeName { rtype, name, .. } => {
                reconciler.find(&zone.rrsets, rtype, name)
            }
        }
        .ok_or_else(|| ProviderError::RecordNotFound {
            provider: self.provider_name().to_string(),
            record_id: req.target.describe(),
            raw_message: None,
        })?;

        let renamed = req
            .name
            .as_deref()
            .is_some_and(|n| !names_match(&zone.domain, n, &target.name));
        let retyped = req
            .rtype
            .as_deref()
            .is_some_and(|t| !t.eq_ignore_ascii_case(&target.rtype));
        if renamed || retyped {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "name".to_string(),
                detail: format!(
                    "rrset {}/{} cannot change its name or type in place",
                    target.name, target.rtype
                ),
            });
        }

        let mut changed = self
            .apply(&zone_id, reconciler.plan_replace(target, req.content.as_deref(), None))
            .await?;

        if let Some(ttl) = self.ttl
            && target.ttl != Some(ttl)
        {
            self.rrset_action(
                &zone_id,
                &target.name,
                &target.rtype,
                "change_ttl",
                &ChangeTtlBody { ttl },
            )
            .await?;
            self.session.invalidate();
            changed = true;
        }

        if !changed {
            log::info!("[hetzner] {} unchanged", req.target.describe());
        }
        Ok(true)
    }

    async fn delete_record(&mut self, selector: &RecordSelector) -> Result<bool> {
        let zone_id = self.session.enter_operation("delete_record")?;
        let zone = self.load_zone(&zone_id).await?;
        let reconciler = Reconciler::new(&zone.domain, CODEC);

        let change = match selector {
            RecordSelector::ByIdentifier { identifier } => {
                reconciler.plan_delete(Self::find_by_id(&zone, identifier), None)
            }
            RecordSelector::ByTypeName {
                rtype,
                name,
                content,
            } => reconciler.plan_delete(reconciler.find(&zone.rrsets, rtype, name), content.as_deref()),
        };

        if !self.apply(&zone_id, change).await? {
            log::info!("[hetzner] nothing to delete for {}", selector.describe());
        }
        Ok(true)
    }

    async fn cleanup(&mut self) -> Result<()> {
        self.session.release();
        Ok(())
    }
}
