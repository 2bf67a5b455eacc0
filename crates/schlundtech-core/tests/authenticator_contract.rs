//! Contract Test: Authenticator
//!
//! This test verifies how the authenticator drives its record client.
//!
//! Constraints verified:
//! - perform issues exactly one add per challenge, with the validation FQDN
//! - cleanup issues exactly one remove per provisioned challenge, same token
//! - perform errors propagate; cleanup errors never do
//! - credentials are validated before any client is created
//!
//! If this test fails, the challenge framework may leave stray records or
//! report success for failed validations.

mod common;

use common::*;
use schlundtech_core::config::AuthenticatorConfig;
use schlundtech_core::traits::{Authenticator, Challenge};
use schlundtech_core::{DnsAuthenticator, Error};
use std::time::Duration;
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};

fn authenticator(
    dir: &std::path::Path,
    factory: &MockClientFactory,
) -> DnsAuthenticator {
    let path = write_credentials(dir);
    let config = AuthenticatorConfig::new(path).with_propagation_delay(Duration::ZERO);
    DnsAuthenticator::new(
        config,
        Box::new(MockClientFactory::sharing_counters_with(factory)),
    )
    .expect("authenticator construction succeeds")
}

#[tokio::test]
async fn perform_adds_one_record_per_challenge() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    let challenge = Challenge::new(DOMAIN, "validation-token");
    assert_ok!(auth.perform(&[challenge.clone()]).await);

    assert_eq!(
        factory.calls(),
        vec![ClientCall::Add {
            domain: DOMAIN.to_string(),
            record_name: format!("_acme-challenge.{}", DOMAIN),
            content: "validation-token".to_string(),
        }]
    );
    assert!(auth.is_provisioned(&challenge));

    // Settings come from the credentials file
    let settings = factory.seen_settings();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0].credentials.user, USER);
    assert_eq!(settings[0].credentials.password, PASSWORD);
    assert_eq!(settings[0].credentials.context, CONTEXT);
}

#[tokio::test]
async fn cleanup_removes_provisioned_record_with_same_token() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    let challenge = Challenge::new(DOMAIN, "validation-token");
    auth.perform(&[challenge.clone()]).await.unwrap();
    auth.cleanup(&[challenge.clone()]).await.unwrap();

    let calls = factory.calls();
    assert_eq!(calls.len(), 2, "Expected one add and one remove, got {:?}", calls);
    assert_eq!(
        calls[1],
        ClientCall::Del {
            domain: DOMAIN.to_string(),
            record_name: format!("_acme-challenge.{}", DOMAIN),
            content: "validation-token".to_string(),
        }
    );
    assert!(!auth.is_provisioned(&challenge));
}

#[tokio::test]
async fn cleanup_of_adopted_challenge_removes_record() {
    // A cleanup hook runs in a fresh process and adopts the auth hook's record
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    let challenge = Challenge::new(DOMAIN, "validation-token");
    auth.assume_provisioned(&[challenge.clone()]);
    auth.cleanup(&[challenge]).await.unwrap();

    assert_eq!(
        factory.calls(),
        vec![ClientCall::Del {
            domain: DOMAIN.to_string(),
            record_name: format!("_acme-challenge.{}", DOMAIN),
            content: "validation-token".to_string(),
        }]
    );
}

#[tokio::test]
async fn cleanup_skips_challenges_never_provisioned() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    auth.cleanup(&[Challenge::new(DOMAIN, "token")]).await.unwrap();

    assert!(factory.calls().is_empty());
    assert_eq!(factory.create_call_count(), 0);
}

#[tokio::test]
async fn perform_stops_at_first_failure() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new().with_failure_on_add());
    let mut auth = authenticator(dir.path(), &factory);

    let first = Challenge::new(DOMAIN, "a");
    let second = Challenge::new("example.org", "b");
    let err = assert_err!(auth.perform(&[first.clone(), second.clone()]).await);

    assert!(matches!(err, Error::AlreadyExists { .. }));
    assert_eq!(factory.calls().len(), 1, "Second challenge must not be attempted");
    assert!(!auth.is_provisioned(&first));
    assert!(!auth.is_provisioned(&second));
}

#[tokio::test]
async fn cleanup_swallows_client_failures() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new().with_failure_on_del());
    let mut auth = authenticator(dir.path(), &factory);

    let challenges = vec![Challenge::new(DOMAIN, "a"), Challenge::new("example.org", "b")];
    auth.perform(&challenges).await.unwrap();

    assert_ok!(auth.cleanup(&challenges).await);
    // Both removals attempted despite the first failing
    let removals = factory
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ClientCall::Del { .. }))
        .count();
    assert_eq!(removals, 2);
}

#[tokio::test]
async fn cleanup_swallows_credentials_failures() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    let challenge = Challenge::new(DOMAIN, "a");
    auth.perform(&[challenge.clone()]).await.unwrap();

    // Credentials disappear between perform and cleanup
    std::fs::remove_file(dir.path().join("file.ini")).unwrap();

    assert_ok!(auth.cleanup(&[challenge]).await);
    assert_eq!(factory.calls().len(), 1, "No remove without credentials");
}

#[tokio::test]
async fn perform_rejects_invalid_credentials_before_network() {
    let dir = tempdir().unwrap();
    let path = write_credentials_content(dir.path(), "auth_user = user\nauth_context = ten\n");
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = DnsAuthenticator::new(
        AuthenticatorConfig::new(path),
        Box::new(MockClientFactory::sharing_counters_with(&factory)),
    )
    .unwrap();

    let err = assert_err!(auth.perform(&[Challenge::new(DOMAIN, "a")]).await);

    assert!(matches!(err, Error::Credentials(_)));
    assert_eq!(factory.create_call_count(), 0);
    assert!(factory.calls().is_empty());
}

#[tokio::test]
async fn wildcard_challenge_uses_base_domain() {
    let dir = tempdir().unwrap();
    let factory = MockClientFactory::new(MockRecordClient::new());
    let mut auth = authenticator(dir.path(), &factory);

    auth.perform(&[Challenge::new("*.example.com", "w")]).await.unwrap();

    assert_eq!(
        factory.calls(),
        vec![ClientCall::Add {
            domain: DOMAIN.to_string(),
            record_name: "_acme-challenge.example.com".to_string(),
            content: "w".to_string(),
        }]
    );
}

#[test]
fn propagation_delay_is_exposed() {
    let config = AuthenticatorConfig::new("/tmp/credentials.ini")
        .with_propagation_delay(Duration::from_secs(60));
    let auth = DnsAuthenticator::new(
        config,
        Box::new(MockClientFactory::new(MockRecordClient::new())),
    )
    .unwrap();

    assert_eq!(auth.propagation_delay(), Duration::from_secs(60));
}
