//! DevNomads HTTP request methods

use reqwest::Method;
use serde::de::IgnoredAny;

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::utils::names::ensure_dot;

use super::types::{PatchRrset, PatchZoneBody};
use super::{DevnomadsProvider, PdnsZone};

impl DevnomadsProvider {
    fn zone_path(&self) -> String {
        format!(
            "/zones/{}",
            urlencoding::encode(&ensure_dot(self.session.domain()))
        )
    }

    /// Fetch the zone with all of its rrsets.
    pub(crate) async fn get_zone(&self) -> Result<PdnsZone> {
        self.client
            .request_json(
                self,
                Method::GET,
                &self.zone_path(),
                &[],
                None::<&()>,
                ErrorContext::domain(self.session.domain()),
            )
            .await
    }

    /// Replace or delete one rrset.
    pub(crate) async fn patch_rrset(&self, rrset: PatchRrset) -> Result<()> {
        let ctx = ErrorContext::record(
            self.session.domain(),
            format!("{}/{}", rrset.record_type, rrset.name),
        );
        let body = PatchZoneBody {
            rrsets: vec![rrset],
        };
        let _: IgnoredAny = self
            .client
            .request_json(self, Method::PATCH, &self.zone_path(), &[], Some(&body), ctx)
            .await?;
        Ok(())
    }
}
