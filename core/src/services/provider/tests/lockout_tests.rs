//! Lockout and unlock behavior

use std::sync::Arc;

use crate::domain::entities::ProviderProperties;
use crate::services::provider::{MailOtpConfig, MailOtpProvider, MfaRequest, MfaUser};

use super::mocks::{MockFlash, MockMailNotifier, MockPropertyStore};

fn provider_with_limit(store: Arc<MockPropertyStore>, max_attempts: i64) -> MailOtpProvider {
    MailOtpProvider::new(
        store,
        Arc::new(MockMailNotifier::new(false)),
        Arc::new(MockFlash::new()),
        MailOtpConfig::new().with_max_attempts(max_attempts),
    )
}

fn user() -> MfaUser {
    MfaUser::new("42", "account@example.com")
}

#[tokio::test]
async fn test_lockout_after_max_failed_attempts() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.auth_code = "048213".to_string();
    store.seed("42", props);

    let provider = provider_with_limit(store.clone(), 3);
    let wrong = MfaRequest::new().with_body("authCode", "000000");

    for expected_attempts in 1..=3u32 {
        assert!(!provider.verify(&wrong, &user()).await);
        assert_eq!(store.get("42").unwrap().attempts, expected_attempts);
    }

    assert!(provider.is_locked(&user()).await);

    // Even the correct code is rejected while locked, with no state change
    let correct = MfaRequest::new().with_body("authCode", "048213");
    assert!(!provider.verify(&correct, &user()).await);
    assert_eq!(store.get("42").unwrap().attempts, 3);
    assert!(provider.is_locked(&user()).await);
}

#[tokio::test]
async fn test_successful_verify_resets_lockout_counter() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.auth_code = "048213".to_string();
    store.seed("42", props);

    let provider = provider_with_limit(store.clone(), 3);
    let wrong = MfaRequest::new().with_body("authCode", "111111");
    let correct = MfaRequest::new().with_body("authCode", "048213");

    assert!(!provider.verify(&wrong, &user()).await);
    assert!(!provider.verify(&wrong, &user()).await);
    assert!(provider.verify(&correct, &user()).await);

    assert_eq!(store.get("42").unwrap().attempts, 0);
    assert!(!provider.is_locked(&user()).await);
}

#[tokio::test]
async fn test_unlock_resets_attempts() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.auth_code = "048213".to_string();
    props.attempts = 3;
    store.seed("42", props);

    let provider = provider_with_limit(store.clone(), 3);
    assert!(provider.is_locked(&user()).await);

    assert!(provider.unlock(&MfaRequest::new(), &user()).await);

    let props = store.get("42").unwrap();
    assert_eq!(props.attempts, 0);
    assert!(!provider.is_locked(&user()).await);
    // The outstanding code is untouched by an unlock
    assert_eq!(props.auth_code, "048213");
}

#[tokio::test]
async fn test_unlock_is_noop_when_not_locked() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.attempts = 1;
    store.seed("42", props.clone());

    let provider = provider_with_limit(store.clone(), 3);
    assert!(!provider.unlock(&MfaRequest::new(), &user()).await);
    assert_eq!(store.get("42").unwrap(), props);
}

#[tokio::test]
async fn test_unlock_is_noop_when_inactive() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.active = false;
    props.attempts = 5;
    store.seed("42", props.clone());

    let provider = provider_with_limit(store.clone(), 3);
    assert!(!provider.unlock(&MfaRequest::new(), &user()).await);
    assert_eq!(store.get("42").unwrap(), props);
}

#[tokio::test]
async fn test_unlock_is_noop_without_entry() {
    let store = Arc::new(MockPropertyStore::new(false));
    let provider = provider_with_limit(store, 3);
    assert!(!provider.unlock(&MfaRequest::new(), &user()).await);
}

#[tokio::test]
async fn test_never_locked_without_entry() {
    let store = Arc::new(MockPropertyStore::new(false));
    let provider = provider_with_limit(store, 3);

    // No entry means never locked, whatever the attempt limit
    assert!(!provider.is_locked(&user()).await);
}

#[tokio::test]
async fn test_unlimited_attempts_never_lock() {
    let store = Arc::new(MockPropertyStore::new(false));
    let mut props = ProviderProperties::activated("user@example.com");
    props.auth_code = "048213".to_string();
    store.seed("42", props);

    // Default configuration: no lockout
    let provider = provider_with_limit(store.clone(), -1);
    let wrong = MfaRequest::new().with_body("authCode", "000000");

    for _ in 0..50 {
        assert!(!provider.verify(&wrong, &user()).await);
    }

    assert_eq!(store.get("42").unwrap().attempts, 50);
    assert!(!provider.is_locked(&user()).await);

    // And the correct code still goes through
    let correct = MfaRequest::new().with_body("authCode", "048213");
    assert!(provider.verify(&correct, &user()).await);
}
