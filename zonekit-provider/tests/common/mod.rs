//! Shared integration test helpers

#![allow(dead_code)]

use std::env;

use zonekit_provider::{
    DnsProvider, ProviderConfig, ProviderCredentials, ProviderOptions, Record, RecordFilter,
    RecordSelector, create_provider,
};

/// Skips the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: environment variable {} is not set", $var);
                return;
            }
        )+
    };
}

/// Asserts that an `Option` is `Some` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts that a `Result` is `Ok` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Unique record name for one test run.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// Test context: one provider bound to the test domain.
pub struct TestContext {
    pub provider: Box<dyn DnsProvider>,
    pub domain: String,
}

impl TestContext {
    fn new(credentials: ProviderCredentials) -> Option<Self> {
        let domain = env::var("TEST_DOMAIN").ok()?;
        let options = ProviderOptions {
            api_endpoint: env::var("TEST_API_ENDPOINT").ok(),
            ..ProviderOptions::default()
        };
        let provider = create_provider(ProviderConfig {
            domain: domain.clone(),
            credentials,
            options,
        })
        .ok()?;
        Some(Self { provider, domain })
    }

    /// Hetzner Cloud test context
    pub fn hetzner() -> Option<Self> {
        let auth_token = env::var("HETZNER_AUTH_TOKEN").ok()?;
        Self::new(ProviderCredentials::Hetzner { auth_token })
    }

    /// DevNomads test context
    pub fn devnomads() -> Option<Self> {
        let auth_token = env::var("DEVNOMADS_AUTH_TOKEN").ok()?;
        Self::new(ProviderCredentials::Devnomads { auth_token })
    }

    /// Scaleway test context
    pub fn scaleway() -> Option<Self> {
        let auth_secret_key = env::var("SCALEWAY_AUTH_SECRET_KEY").ok()?;
        Self::new(ProviderCredentials::Scaleway { auth_secret_key })
    }

    /// Records of one type and name.
    pub async fn records(&mut self, rtype: &str, name: &str) -> Vec<Record> {
        self.provider
            .list_records(&RecordFilter::new(Some(rtype), Some(name), None))
            .await
            .unwrap_or_default()
    }

    /// Best effort removal of every value of `rtype name`.
    pub async fn cleanup_record(&mut self, rtype: &str, name: &str) {
        if let Ok(selector) = RecordSelector::from_parts(None, Some(rtype), Some(name), None) {
            let _ = self.provider.delete_record(&selector).await;
        }
    }

    /// Finds and removes every leftover test record (names starting with `_test-`).
    pub async fn cleanup_all_test_records(&mut self) {
        let Ok(records) = self.provider.list_records(&RecordFilter::all()).await else {
            return;
        };
        for record in records.iter().filter(|r| r.name.starts_with("_test-")) {
            let selector = RecordSelector::ByIdentifier {
                identifier: record.id.clone(),
            };
            let _ = self.provider.delete_record(&selector).await;
        }
    }
}

/// Integration suite run against every provider.
///
/// `$ctx` builds the [`TestContext`], the remaining arguments are the
/// environment variables the provider needs.
#[macro_export]
macro_rules! provider_test_suite {
    ($prefix:ident, $ctx:expr, $($var:expr),+) => {
        mod $prefix {
            use super::common::{self, TestContext};
            use crate::{require_ok, require_some, skip_if_no_credentials};
            use zonekit_provider::{
                ErrorKind, ProviderState, RecordFilter, RecordSelector, UpdateRecordRequest,
            };

            async fn authenticated() -> Option<TestContext> {
                let mut ctx: TestContext = $ctx?;
                ctx.provider.authenticate().await.ok()?;
                Some(ctx)
            }

            #[tokio::test]
            #[ignore]
            async fn authenticate_resolves_zone() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx: TestContext = require_some!($ctx, "failed to build test context");
                require_ok!(ctx.provider.authenticate().await, "authenticate failed");
                assert_eq!(ctx.provider.state(), ProviderState::Authenticated);

                require_ok!(ctx.provider.cleanup().await);
                assert_eq!(ctx.provider.state(), ProviderState::Released);
                let err = ctx.provider.list_records(&RecordFilter::all()).await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Configuration);
            }

            #[tokio::test]
            #[ignore]
            async fn create_is_idempotent_and_listed() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                let name = common::generate_test_record_name();

                require_ok!(ctx.provider.create_record("TXT", &name, "challenge-token").await);
                require_ok!(ctx.provider.create_record("TXT", &name, "challenge-token").await);

                let records = ctx.records("TXT", &name).await;
                let matching = records.iter().filter(|r| r.content == "challenge-token").count();
                assert_eq!(matching, 1, "records: {records:?}");
                assert!(records[0].name.starts_with(&name));
                assert!(records[0].name.ends_with('.'));

                ctx.cleanup_record("TXT", &name).await;
                assert!(ctx.records("TXT", &name).await.is_empty());
            }

            #[tokio::test]
            #[ignore]
            async fn txt_with_quotes_round_trips() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                let name = common::generate_test_record_name();
                let content = r#"say "hello" to everyone"#;

                require_ok!(ctx.provider.create_record("TXT", &name, content).await);
                let records = ctx.records("TXT", &name).await;
                ctx.cleanup_record("TXT", &name).await;

                assert_eq!(records.len(), 1, "records: {records:?}");
                assert_eq!(records[0].content, content);
            }

            #[tokio::test]
            #[ignore]
            async fn partial_delete_keeps_other_values() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                let name = common::generate_test_record_name();

                require_ok!(ctx.provider.create_record("A", &name, "192.0.2.1").await);
                require_ok!(ctx.provider.create_record("A", &name, "192.0.2.2").await);
                assert_eq!(ctx.records("A", &name).await.len(), 2);

                let selector = require_ok!(RecordSelector::from_parts(
                    None,
                    Some("A"),
                    Some(&name),
                    Some("192.0.2.1")
                ));
                require_ok!(ctx.provider.delete_record(&selector).await);
                let left = ctx.records("A", &name).await;
                assert_eq!(left.len(), 1, "records: {left:?}");
                assert_eq!(left[0].content, "192.0.2.2");

                let selector = require_ok!(RecordSelector::from_parts(
                    None,
                    Some("A"),
                    Some(&name),
                    Some("192.0.2.2")
                ));
                require_ok!(ctx.provider.delete_record(&selector).await);
                assert!(ctx.records("A", &name).await.is_empty());

                // nothing left to delete
                require_ok!(ctx.provider.delete_record(&selector).await);
            }

            #[tokio::test]
            #[ignore]
            async fn update_by_identifier_replaces_content() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                let name = common::generate_test_record_name();

                require_ok!(ctx.provider.create_record("TXT", &name, "before").await);
                let records = ctx.records("TXT", &name).await;
                let record = require_some!(records.first(), "created record not listed");

                let req = require_ok!(UpdateRecordRequest::from_parts(
                    Some(&record.id),
                    Some("TXT"),
                    Some(&name),
                    Some("after")
                ));
                let updated = ctx.provider.update_record(&req).await;
                let records = ctx.records("TXT", &name).await;
                ctx.cleanup_record("TXT", &name).await;

                require_ok!(updated, "update_record failed");
                assert!(records.iter().all(|r| r.content != "before"), "records: {records:?}");
                assert!(records.iter().any(|r| r.content == "after"), "records: {records:?}");
            }

            #[tokio::test]
            #[ignore]
            async fn filters_narrow_monotonically() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                let name = common::generate_test_record_name();
                require_ok!(ctx.provider.create_record("TXT", &name, "one").await);
                require_ok!(ctx.provider.create_record("TXT", &name, "two").await);

                let all = require_ok!(ctx.provider.list_records(&RecordFilter::all()).await);
                let by_type = require_ok!(
                    ctx.provider
                        .list_records(&RecordFilter::new(Some("TXT"), None, None))
                        .await
                );
                let exact = require_ok!(
                    ctx.provider
                        .list_records(&RecordFilter::new(Some("TXT"), Some(&name), Some("two")))
                        .await
                );
                ctx.cleanup_record("TXT", &name).await;

                assert!(all.len() >= by_type.len());
                assert!(by_type.len() >= exact.len());
                assert_eq!(exact.len(), 1);
                assert!(by_type.contains(&exact[0]));
            }

            /// Removes leftover test records (run manually)
            #[tokio::test]
            #[ignore]
            async fn cleanup_test_records() {
                skip_if_no_credentials!($($var),+, "TEST_DOMAIN");

                let mut ctx = require_some!(authenticated().await, "authenticate failed");
                ctx.cleanup_all_test_records().await;
            }
        }
    };
}
