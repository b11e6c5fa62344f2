//! Email one-time-code provider implementation

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use constant_time_eq::constant_time_eq;

use mf_shared::utils::email::{is_valid_email, mask_email};

use crate::domain::entities::ProviderProperties;
use crate::errors::{ProviderError, ProviderResult};

use super::config::MailOtpConfig;
use super::traits::{AuthCodeEmail, FlashMessenger, MailNotifier, PropertyStore, TracingFlash};
use super::types::{AuthViewData, EditViewData, MfaRequest, MfaUser, MfaViewType, ViewResponse};

/// Display format for `lastUsed`/`updated` on the edit screen
const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M";

/// The email one-time-code MFA provider
///
/// Stateless beyond configuration: all mutable state lives in the property
/// store record of the user each operation is invoked for. Operations report
/// failure as `false` to the host platform; the underlying store or mail
/// errors are logged, never thrown.
pub struct MailOtpProvider {
    /// Property storage scoped to this provider
    store: Arc<dyn PropertyStore>,
    /// Mail delivery for auth codes
    notifier: Arc<dyn MailNotifier>,
    /// User-visible validation messages
    flash: Arc<dyn FlashMessenger>,
    /// Provider configuration
    config: MailOtpConfig,
}

impl MailOtpProvider {
    /// Create a new provider
    ///
    /// # Arguments
    ///
    /// * `store` - Property store scoped to this provider's identifier
    /// * `notifier` - Mail delivery implementation
    /// * `flash` - Sink for user-visible validation messages
    /// * `config` - Provider configuration
    pub fn new(
        store: Arc<dyn PropertyStore>,
        notifier: Arc<dyn MailNotifier>,
        flash: Arc<dyn FlashMessenger>,
        config: MailOtpConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            flash,
            config,
        }
    }

    /// Create a provider that logs validation messages instead of queueing them
    pub fn without_flash(
        store: Arc<dyn PropertyStore>,
        notifier: Arc<dyn MailNotifier>,
        config: MailOtpConfig,
    ) -> Self {
        Self::new(store, notifier, Arc::new(TracingFlash), config)
    }

    /// Whether this provider can handle the request
    ///
    /// Always true; kept as an extension point for request filtering.
    pub fn can_process(&self, _request: &MfaRequest) -> bool {
        true
    }

    /// Evaluate if the provider is activated for the user
    pub async fn is_active(&self, user: &MfaUser) -> bool {
        self.load_entry(user)
            .await
            .map_or(false, |props| props.active)
    }

    /// Evaluate if the provider is temporarily locked for the user
    ///
    /// Locked means the maximum attempts are exceeded. A provider can only be
    /// locked once set up: without a store entry any stale attempts value is
    /// meaningless.
    pub async fn is_locked(&self, user: &MfaUser) -> bool {
        self.load_entry(user)
            .await
            .map_or(false, |props| self.attempts_exceeded(&props))
    }

    /// Activate the provider for the user
    ///
    /// Activation and email (re)configuration are the same operation.
    pub async fn activate(&self, request: &MfaRequest, user: &MfaUser) -> bool {
        self.update(request, user).await
    }

    /// Update the provider data from the submitted email address
    ///
    /// Creates the store entry on first use; this is the sole activation
    /// path. An empty or malformed address leaves the stored properties
    /// untouched, queues a user-visible message and returns false.
    pub async fn update(&self, request: &MfaRequest, user: &MfaUser) -> bool {
        if !self.can_process(request) {
            return false;
        }

        let email = request.email();
        if let Err(e) = self.check_valid_email(&email) {
            tracing::warn!(
                user = user.id.as_str(),
                event = "mfa_email_rejected",
                error = %e,
                "Rejected submitted MFA email address"
            );
            return false;
        }

        let result = self.try_store_email(user, &email).await;
        match result {
            Ok(()) => {
                tracing::info!(
                    user = user.id.as_str(),
                    email = mask_email(&email).as_str(),
                    event = "mfa_provider_updated",
                    "Stored MFA email configuration"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    user = user.id.as_str(),
                    error = %e,
                    event = "mfa_store_failed",
                    "Failed to persist MFA email configuration"
                );
                false
            }
        }
    }

    /// Handle the deactivate action
    ///
    /// A no-op returning false unless the provider is active. The email,
    /// code and attempt history are kept so reactivation loses nothing.
    pub async fn deactivate(&self, _request: &MfaRequest, user: &MfaUser) -> bool {
        let Some(mut props) = self.load_entry(user).await else {
            return false;
        };
        if !props.active {
            return false;
        }

        props.active = false;
        props.touch(Self::now());

        let ok = self.persist(user, &props).await;
        if ok {
            tracing::info!(
                user = user.id.as_str(),
                event = "mfa_provider_deactivated",
                "Deactivated email MFA provider"
            );
        }
        ok
    }

    /// Handle the unlock action by resetting the attempts counter
    ///
    /// A no-op returning false unless the provider is both active and
    /// currently locked.
    pub async fn unlock(&self, _request: &MfaRequest, user: &MfaUser) -> bool {
        let Some(mut props) = self.load_entry(user).await else {
            return false;
        };
        if !props.active || !self.attempts_exceeded(&props) {
            return false;
        }

        props.reset_attempts();
        props.touch(Self::now());

        let ok = self.persist(user, &props).await;
        if ok {
            tracing::info!(
                user = user.id.as_str(),
                event = "mfa_provider_unlocked",
                "Reset failed verification attempts"
            );
        }
        ok
    }

    /// Verify the submitted auth code
    ///
    /// Preconditions: the provider must be active, not locked, and have a
    /// code outstanding; otherwise returns false without touching state.
    /// A mismatch increments the attempt counter. A match clears the code,
    /// resets the counter and stamps the verification time.
    ///
    /// # Arguments
    ///
    /// * `request` - Inbound request; the code is read from the query
    ///   parameters first, then the body
    /// * `user` - The user being verified
    pub async fn verify(&self, request: &MfaRequest, user: &MfaUser) -> bool {
        let Some(mut props) = self.load_entry(user).await else {
            return false;
        };
        if !props.active || self.attempts_exceeded(&props) {
            // Can not verify an inactive or locked provider
            return false;
        }
        if !props.has_outstanding_code() {
            tracing::debug!(
                user = user.id.as_str(),
                event = "mfa_no_code_outstanding",
                "Verification attempted with no code outstanding"
            );
            return false;
        }

        let now = Self::now();
        let input = request.auth_code();
        if !Self::codes_match(&input, &props.auth_code) {
            props.record_failed_attempt();
            props.touch(now);

            tracing::warn!(
                user = user.id.as_str(),
                attempts = props.attempts,
                event = "mfa_verification_failed",
                "Auth code mismatch"
            );

            self.persist(user, &props).await;
            return false;
        }

        props.record_successful_verification(now);
        props.touch(now);

        let ok = self.persist(user, &props).await;
        if ok {
            tracing::info!(
                user = user.id.as_str(),
                event = "mfa_verification_success",
                "Auth code verified"
            );
        }
        ok
    }

    /// Issue a code if none is outstanding, and mail it to the user
    ///
    /// A fresh code is persisted before delivery is attempted, so a mail
    /// failure never loses state: the stored code stays valid and a later
    /// resend delivers it. The message is only dispatched when the code was
    /// just generated or `force_resend` is set; an already outstanding code
    /// is not re-sent otherwise.
    pub async fn issue_or_resend_code(&self, user: &MfaUser, force_resend: bool) {
        let Some(mut props) = self.load_entry(user).await else {
            return;
        };

        let mut newly_issued = false;
        if !props.has_outstanding_code() {
            props.issue_code();
            props.touch(Self::now());

            if !self.persist(user, &props).await {
                // Never mail a code that is not stored.
                return;
            }
            newly_issued = true;

            tracing::info!(
                user = user.id.as_str(),
                event = "mfa_code_issued",
                "Generated new auth code"
            );
        }

        if newly_issued || force_resend {
            self.dispatch_code(user, &props).await;
        }
    }

    /// Prepare view data for the requested provider screen
    ///
    /// For the setup/edit screens this is a pure read. Displaying the auth
    /// screen issues (or force-resends) the code as a side effect, so the
    /// challenge mail goes out the moment the screen is shown.
    pub async fn handle_request(
        &self,
        request: &MfaRequest,
        user: &MfaUser,
        view_type: MfaViewType,
    ) -> ViewResponse {
        match view_type {
            MfaViewType::Setup | MfaViewType::Edit => {
                ViewResponse::Edit(self.prepare_edit_view(user).await)
            }
            MfaViewType::Auth => {
                ViewResponse::Auth(self.prepare_auth_view(request, user).await)
            }
        }
    }

    async fn prepare_edit_view(&self, user: &MfaUser) -> EditViewData {
        let props = self.load_entry(user).await.unwrap_or_default();
        let email = if props.email.is_empty() {
            user.email.clone()
        } else {
            props.email.clone()
        };

        EditViewData {
            email,
            last_used: Self::format_timestamp(props.last_used),
            updated: Self::format_timestamp(props.updated),
        }
    }

    async fn prepare_auth_view(&self, request: &MfaRequest, user: &MfaUser) -> AuthViewData {
        let resend = request.resend_requested();
        self.issue_or_resend_code(user, resend).await;

        let mut resend_params = request.query_params().clone();
        resend_params.insert("resend".to_string(), "1".to_string());

        AuthViewData {
            is_locked: self.is_locked(user).await,
            resend_params,
        }
    }

    async fn dispatch_code(&self, user: &MfaUser, props: &ProviderProperties) {
        let mail = AuthCodeEmail {
            to: props.email.clone(),
            code: props.auth_code.clone(),
            template: self.config.mail_template.clone(),
            layout: self.config.mail_layout.clone(),
            sender_email: self.config.sender_email.clone(),
            sender_name: self.config.sender_name.clone(),
        };

        match self.notifier.send_auth_code(&mail).await {
            Ok(message_id) => {
                tracing::info!(
                    user = user.id.as_str(),
                    to = mask_email(&props.email).as_str(),
                    message_id = message_id.as_str(),
                    event = "mfa_mail_sent",
                    "Auth code mail dispatched"
                );
            }
            Err(e) => {
                // Fire-and-forget: the stored code stays valid for a resend.
                let err = ProviderError::mail(e);
                tracing::error!(
                    user = user.id.as_str(),
                    to = mask_email(&props.email).as_str(),
                    error = %err,
                    event = "mfa_mail_failed",
                    "Auth code mail dispatch failed"
                );
            }
        }
    }

    async fn try_store_email(&self, user: &MfaUser, email: &str) -> ProviderResult<()> {
        let has_entry = self
            .store
            .exists(&user.id)
            .await
            .map_err(ProviderError::store)?;

        if has_entry {
            let mut props = self
                .store
                .load(&user.id)
                .await
                .map_err(ProviderError::store)?
                .unwrap_or_default();
            props.email = email.to_string();
            props.active = true;
            props.touch(Self::now());

            self.store
                .update(&user.id, &props)
                .await
                .map_err(ProviderError::store)
        } else {
            let mut props = ProviderProperties::activated(email);
            props.touch(Self::now());

            self.store
                .create(&user.id, &props)
                .await
                .map_err(ProviderError::store)
        }
    }

    fn check_valid_email(&self, email: &str) -> ProviderResult<()> {
        if email.is_empty() {
            self.flash.error(
                "Email address missing",
                "Enter the email address that should receive your one-time codes.",
            );
            return Err(ProviderError::validation("email is empty"));
        }
        if !is_valid_email(email) {
            self.flash.error(
                "Email address not valid",
                "The given email address is not valid, please try again.",
            );
            return Err(ProviderError::validation("email is not a valid address"));
        }
        Ok(())
    }

    /// Load the user's entry, mapping store failures to "no entry"
    async fn load_entry(&self, user: &MfaUser) -> Option<ProviderProperties> {
        match self.store.load(&user.id).await {
            Ok(props) => props,
            Err(e) => {
                tracing::error!(
                    user = user.id.as_str(),
                    error = e.as_str(),
                    event = "mfa_store_failed",
                    "Failed to load provider properties"
                );
                None
            }
        }
    }

    /// Persist the record, mapping store failures to false
    async fn persist(&self, user: &MfaUser, props: &ProviderProperties) -> bool {
        match self.store.update(&user.id, props).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    user = user.id.as_str(),
                    error = e.as_str(),
                    event = "mfa_store_failed",
                    "Failed to persist provider properties"
                );
                false
            }
        }
    }

    fn attempts_exceeded(&self, props: &ProviderProperties) -> bool {
        props.attempts >= self.config.max_attempts
    }

    /// Constant-time code comparison; exact match, leading zeros matter
    fn codes_match(input: &str, stored: &str) -> bool {
        input.len() == stored.len() && constant_time_eq(input.as_bytes(), stored.as_bytes())
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    /// Format a unix timestamp for display, empty string for "never"
    fn format_timestamp(timestamp: i64) -> String {
        if timestamp == 0 {
            return String::new();
        }
        match Utc.timestamp_opt(timestamp, 0) {
            chrono::LocalResult::Single(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
            _ => String::new(),
        }
    }
}
