//! End-to-end provider flow: setup, challenge, lockout, unlock, verification

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mf_core::domain::entities::{is_well_formed_code, ProviderProperties};
use mf_core::services::provider::{
    AuthCodeEmail, MailNotifier, MailOtpConfig, MailOtpProvider, MfaRequest, MfaUser, MfaViewType,
    PropertyStore,
};

struct InMemoryStore {
    records: Mutex<HashMap<String, ProviderProperties>>,
}

impl InMemoryStore {
    fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, user_id: &str) -> Option<ProviderProperties> {
        self.records.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl PropertyStore for InMemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProviderProperties>, String> {
        Ok(self.records.lock().unwrap().get(user_id).cloned())
    }

    async fn create(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        self.records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), props.clone());
        Ok(())
    }

    async fn update(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        self.records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), props.clone());
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> Result<bool, String> {
        Ok(self.records.lock().unwrap().contains_key(user_id))
    }
}

struct RecordingNotifier {
    sent: Mutex<Vec<AuthCodeEmail>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailNotifier for RecordingNotifier {
    async fn send_auth_code(&self, mail: &AuthCodeEmail) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

#[tokio::test]
async fn test_full_provider_lifecycle() {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let provider = MailOtpProvider::without_flash(
        store.clone(),
        notifier.clone(),
        MailOtpConfig::new().with_max_attempts(3),
    );
    let user = MfaUser::new("501", "editor@example.com");

    // Setup: submitting a valid address activates the provider
    let setup = MfaRequest::new().with_body("email", "second-factor@example.com");
    assert!(provider.activate(&setup, &user).await);
    assert!(provider.is_active(&user).await);
    assert!(!provider.is_locked(&user).await);

    // Login: showing the auth screen issues and mails a code
    provider
        .handle_request(&MfaRequest::new(), &user, MfaViewType::Auth)
        .await;
    let code = store.get("501").unwrap().auth_code;
    assert!(is_well_formed_code(&code));
    assert_eq!(notifier.sent_count(), 1);

    // Reloading the screen does not mail again
    provider
        .handle_request(&MfaRequest::new(), &user, MfaViewType::Auth)
        .await;
    assert_eq!(notifier.sent_count(), 1);

    // Three wrong submissions lock the provider
    let wrong = MfaRequest::new().with_body("authCode", "000000");
    for _ in 0..3 {
        assert!(!provider.verify(&wrong, &user).await);
    }
    assert!(provider.is_locked(&user).await);

    // The correct code is rejected while locked
    let correct = MfaRequest::new().with_body("authCode", code.clone());
    assert!(!provider.verify(&correct, &user).await);

    // Unlock resets the counter and verification goes through
    assert!(provider.unlock(&MfaRequest::new(), &user).await);
    assert!(!provider.is_locked(&user).await);
    assert!(provider.verify(&correct, &user).await);

    let props = store.get("501").unwrap();
    assert_eq!(props.auth_code, "");
    assert_eq!(props.attempts, 0);
    assert!(props.last_used > 0);

    // Deactivate keeps the configuration for a later reactivation
    assert!(provider.deactivate(&MfaRequest::new(), &user).await);
    let props = store.get("501").unwrap();
    assert!(!props.active);
    assert_eq!(props.email, "second-factor@example.com");
}
