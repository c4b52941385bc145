//! Hetzner HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::IgnoredAny;

use crate::error::Result;
use crate::http_client::check_status;
use crate::traits::ErrorContext;

use super::types::{CreateRrsetBody, HetznerRrsetList, HetznerZone, HetznerZoneResponse};
use super::{HetznerProvider, HetznerRrset, MAX_PAGE_SIZE_RRSETS};

impl HetznerProvider {
    fn rrset_path(zone_id: &str, name: &str, rtype: &str) -> String {
        format!("/{zone_id}/rrsets/{}/{rtype}", urlencoding::encode(name))
    }

    fn rrset_context(&self, name: &str, rtype: &str) -> ErrorContext {
        ErrorContext::record(self.session.domain(), format!("{name}/{rtype}"))
    }

    /// Look up the zone by its domain name.
    pub(crate) async fn get_zone(&self) -> Result<HetznerZone> {
        let domain = self.session.domain();
        let resp: HetznerZoneResponse = self
            .client
            .request_json(
                self,
                Method::GET,
                &format!("/{}", urlencoding::encode(domain)),
                &[],
                None::<&()>,
                ErrorContext::domain(domain),
            )
            .await?;
        Ok(resp.zone)
    }

    /// Fetch every rrset of the zone, following `meta.pagination.next_page`.
    pub(crate) async fn fetch_rrsets(&self, zone_id: &str) -> Result<Vec<HetznerRrset>> {
        let path = format!("/{zone_id}/rrsets");
        let mut rrsets = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", MAX_PAGE_SIZE_RRSETS.to_string()),
            ];
            let resp: HetznerRrsetList = self
                .client
                .request_json(
                    self,
                    Method::GET,
                    &path,
                    &query,
                    None::<&()>,
                    ErrorContext::domain(self.session.domain()),
                )
                .await?;
            rrsets.extend(resp.rrsets);

            match resp
                .meta
                .and_then(|m| m.pagination)
                .and_then(|p| p.next_page)
            {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        log::debug!("[hetzner] fetched {} rrsets", rrsets.len());
        Ok(rrsets)
    }

    pub(crate) async fn create_rrset(&self, zone_id: &str, body: &CreateRrsetBody<'_>) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .request_json(
                self,
                Method::POST,
                &format!("/{zone_id}/rrsets"),
                &[],
                Some(body),
                ErrorContext::domain(self.session.domain()),
            )
            .await?;
        Ok(())
    }

    /// Run `actions/{action}` on one rrset.
    pub(crate) async fn rrset_action<B: Serialize + Sync>(
        &self,
        zone_id: &str,
        name: &str,
        rtype: &str,
        action: &str,
        body: &B,
    ) -> Result<()> {
        let path = format!("{}/actions/{action}", Self::rrset_path(zone_id, name, rtype));
        let _: IgnoredAny = self
            .client
            .request_json(
                self,
                Method::POST,
                &path,
                &[],
                Some(body),
                self.rrset_context(name, rtype),
            )
            .await?;
        Ok(())
    }

    /// Delete a whole rrset. A missing rrset is not an error; returns whether
    /// anything was deleted.
    pub(crate) async fn delete_rrset(&self, zone_id: &str, name: &str, rtype: &str) -> Result<bool> {
        let (status, text) = self
            .client
            .execute(
                Method::DELETE,
                &Self::rrset_path(zone_id, name, rtype),
                &[],
                None::<&()>,
            )
            .await?;
        if status == 404 {
            log::info!("[hetzner] rrset {name}/{rtype} already absent");
            return Ok(false);
        }
        check_status(self, status, &text, self.rrset_context(name, rtype))?;
        Ok(true)
    }
}
