//! Scaleway HTTP request methods

use reqwest::Method;
use serde::de::IgnoredAny;

use crate::error::Result;
use crate::traits::ErrorContext;

use super::types::{PatchRecordsBody, RecordChange, ScalewayRecordList};
use super::{MAX_PAGE_SIZE_RECORDS, ScalewayProvider, ScalewayRecord};

impl ScalewayProvider {
    fn records_path(zone: &str) -> String {
        format!("/dns-zones/{}/records", urlencoding::encode(zone))
    }

    /// Fetch every record of the zone, page by page until `total_count`.
    pub(crate) async fn fetch_records(&self, zone: &str) -> Result<Vec<ScalewayRecord>> {
        let path = Self::records_path(zone);
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [
                ("page", page.to_string()),
                ("page_size", MAX_PAGE_SIZE_RECORDS.to_string()),
            ];
            let resp: ScalewayRecordList = self
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

            let fetched = resp.records.len();
            records.extend(resp.records);
            if fetched == 0 || records.len() >= resp.total_count as usize {
                break;
            }
            page += 1;
        }

        log::debug!("[scaleway] fetched {} records", records.len());
        Ok(records)
    }

    /// Apply a batch of changes in one PATCH.
    pub(crate) async fn patch_records(
        &self,
        zone: &str,
        changes: Vec<RecordChange>,
        ctx: ErrorContext,
    ) -> Result<()> {
        let body = PatchRecordsBody { changes };
        let _: IgnoredAny = self
            .client
            .request_json(
                self,
                Method::PATCH,
                &Self::records_path(zone),
                &[],
                Some(&body),
                ctx,
            )
            .await?;
        Ok(())
    }
}
