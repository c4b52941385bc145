//! Scaleway DnsProvider trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::rrset::Reconciler;
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    FieldType, ProviderCredentialField, ProviderMetadata, ProviderState, ProviderType, Record,
    RecordFilter, RecordSelector, RecordSet, UpdateRecordRequest,
};
use crate::utils::content::ContentCodec;
use crate::utils::names::relative_name;

use super::types::{NewRecord, RecordChange};
use super::{DEFAULT_TTL, ScalewayProvider, ScalewayRecord};

const CODEC: ContentCodec = ContentCodec::QUOTED_TXT;

impl ScalewayProvider {
    /// Scaleway names are zone-relative with an empty apex.
    pub(crate) fn vendor_name(domain: &str, name: &str) -> String {
        match relative_name(domain, name).as_str() {
            "@" => String::new(),
            relative => relative.to_string(),
        }
    }

    /// One single-value set per record, keyed by the vendor id.
    fn to_sets(records: &[ScalewayRecord]) -> Vec<RecordSet> {
        records
            .iter()
            .map(|r| RecordSet {
                id: Some(r.id.clone()),
                name: r.name.clone(),
                rtype: r.record_type.clone(),
                ttl: r.ttl,
                values: vec![r.data.clone()],
            })
            .collect()
    }

    pub(crate) fn to_records(domain: &str, records: &[ScalewayRecord]) -> Vec<Record> {
        Reconciler::new(domain, CODEC)
            .flatten(&Self::to_sets(records), |set, _| set.id.clone().unwrap_or_default())
    }

    pub(crate) fn new_record(
        domain: &str,
        rtype: &str,
        name: &str,
        content: &str,
        ttl: u32,
    ) -> NewRecord {
        NewRecord {
            name: Self::vendor_name(domain, name),
            data: CODEC.encode(domain, rtype, content),
            record_type: rtype.to_string(),
            ttl,
        }
    }

    async fn load_records(&mut self, zone: &str) -> Result<Vec<Record>> {
        let records = match self.session.snapshot() {
            Some(records) => records,
            None => {
                let fetched = self.fetch_records(zone).await?;
                self.session.store(fetched.clone());
                fetched
            }
        };
        Ok(Self::to_records(self.session.domain(), &records))
    }

    async fn matching(&mut self, zone: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        let records = self.load_records(zone).await?;
        let domain = self.session.domain().to_string();
        Ok(Reconciler::new(&domain, CODEC).filter(records, filter))
    }
}

#[async_trait]
impl DnsProvider for ScalewayProvider {
    fn id(&self) -> &'static str {
        "scaleway"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Scaleway,
            name: "Scaleway".to_string(),
            description: "Scaleway Domains and DNS".to_string(),
            required_fields: vec![ProviderCredentialField {
                key: "authSecretKey".to_string(),
                label: "Secret Key".to_string(),
                field_type: FieldType::Password,
                help_text: Some("Secret key of a Scaleway API key".to_string()),
            }],
            nameservers: vec!["scw.cloud".to_string()],
            atomic_update: true,
        }
    }

    fn nameservers(&self) -> Vec<String> {
        vec!["scw.cloud".to_string()]
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
        let zone = self.session.domain().to_lowercase();
        let records = self.fetch_records(&zone).await?;
        log::info!("[scaleway] authenticated for zone {zone} ({} records)", records.len());
        self.session.authenticated(zone);
        self.session.store(records);
        Ok(())
    }

    async fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>> {
        let zone = self.session.enter_operation("list_records")?;
        self.matching(&zone, filter).await
    }

    async fn create_record(&mut self, rtype: &str, name: &str, content: &str) -> Result<bool> {
        let zone = self.session.enter_operation("create_record")?;
        let rtype = rtype.to_uppercase();
        let filter = RecordFilter::new(Some(&rtype), Some(name), Some(content));
        if let Some(existing) = self.matching(&zone, &filter).await?.first() {
            log::info!(
                "[scaleway] record {rtype} {name} {content} already exists with id {}",
                existing.id
            );
            return Ok(true);
        }

        let domain = self.session.domain().to_string();
        let record = Self::new_record(
            &domain,
            &rtype,
            name,
            content,
            self.ttl.unwrap_or(DEFAULT_TTL),
        );
        self.patch_records(
            &zone,
            vec![RecordChange::Add {
                records: vec![record],
            }],
            ErrorContext::domain(&domain),
        )
        .await?;
        self.session.invalidate();
        Ok(true)
    }

    async fn update_record(&mut self, req: &UpdateRecordRequest) -> Result<bool> {
        let zone = self.session.enter_operation("update_record")?;
        let domain = self.session.domain().to_string();

        let candidates: Vec<Record> = match &req.target {
            RecordSelector::ByIdentifier { identifier } => self
                .load_records(&zone)
                .await?
                .into_iter()
                .filter(|r| &r.id == identifier)
                .collect(),
            RecordSelector::ByTypeName { rtype, name, .. } => {
                self.matching(&zone, &RecordFilter::new(Some(rtype), Some(name), None))
                    .await?
            }
        };
        let current = match candidates.as_slice() {
            [current] => current.clone(),
            [] => {
                return Err(ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id: req.target.describe(),
                    raw_message: None,
                });
            }
            many => {
                return Err(ProviderError::AmbiguousRecord {
                    provider: self.provider_name().to_string(),
                    selector: req.target.describe(),
                    candidates: many.len(),
                });
            }
        };

        let rtype = req.rtype.as_deref().unwrap_or(&current.rtype);
        let name = req.name.as_deref().unwrap_or(&current.name);
        let content = req.content.as_deref().unwrap_or(&current.content);
        let ttl = self.ttl.or(current.ttl).unwrap_or(DEFAULT_TTL);

        let record = Self::new_record(&domain, rtype, name, content, ttl);
        self.patch_records(
            &zone,
            vec![RecordChange::Set {
                id: current.id.clone(),
                records: vec![record],
            }],
            ErrorContext::record(&domain, current.id.clone()),
        )
        .await?;
        self.session.invalidate();
        Ok(true)
    }

    async fn delete_record(&mut self, selector: &RecordSelector) -> Result<bool> {
        let zone = self.session.enter_operation("delete_record")?;
        let domain = self.session.domain().to_string();

        let targets: Vec<Record> = match selector {
            RecordSelector::ByIdentifier { identifier } => self
                .load_records(&zone)
                .await?
                .into_iter()
                .filter(|r| &r.id == identifier)
                .collect(),
            RecordSelector::ByTypeName {
                rtype,
                name,
                content,
            } => {
                let filter = RecordFilter::new(Some(rtype), Some(name), content.as_deref());
                self.matching(&zone, &filter).await?
            }
        };

        if targets.is_empty() {
            log::info!("[scaleway] nothing to delete for {}", selector.describe());
            return Ok(true);
        }

        let changes = targets
            .into_iter()
            .map(|r| RecordChange::Delete { id: r.id })
            .collect();
        self.patch_records(
            &zone,
            changes,
            ErrorContext::record(&domain, selector.describe()),
        )
        .await?;
        self.session.invalidate();
        Ok(true)
    }

    async fn cleanup(&mut self) -> Result<()> {
        self.session.release();
        Ok(())
    }
}
