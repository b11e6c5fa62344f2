//! Traits for the provider's external collaborators

use async_trait::async_trait;

use crate::domain::entities::ProviderProperties;

/// An auth-code message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCodeEmail {
    /// Destination address
    pub to: String,
    /// The one-time code to deliver
    pub code: String,
    /// Mail template identifier
    pub template: String,
    /// Mail layout identifier
    pub layout: String,
    /// Sender address override; `None` uses the platform default
    pub sender_email: Option<String>,
    /// Sender display name, only meaningful with `sender_email`
    pub sender_name: Option<String>,
}

/// Durable property storage for one provider, keyed by user id
///
/// Implementations persist one [`ProviderProperties`] record per user; the
/// provider identifier is fixed per store instance. Updates replace the whole
/// record last-write-wins; a conditional (compare-and-swap) update here is
/// the place to harden concurrent verification attempts against lost
/// increments.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Load the record for a user, `None` if the user has no entry
    async fn load(&self, user_id: &str) -> Result<Option<ProviderProperties>, String>;
    /// Create the record for a user that has no entry yet
    async fn create(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String>;
    /// Replace the record for a user
    async fn update(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String>;
    /// Check whether a record exists for a user
    async fn exists(&self, user_id: &str) -> Result<bool, String>;
}

/// Mail delivery capability for auth-code messages
#[async_trait]
pub trait MailNotifier: Send + Sync {
    /// Render and deliver an auth-code message, returning a message id
    async fn send_auth_code(&self, mail: &AuthCodeEmail) -> Result<String, String>;
}

/// User-visible message sink for validation failures
///
/// The host platform typically queues these as flash messages on the
/// current session.
pub trait FlashMessenger: Send + Sync {
    /// Queue an error message for display to the current user
    fn error(&self, title: &str, message: &str);
}

/// Flash sink that only writes to the log
///
/// Default for headless contexts where no session message queue exists.
#[derive(Debug, Clone, Default)]
pub struct TracingFlash;

impl FlashMessenger for TracingFlash {
    fn error(&self, title: &str, message: &str) {
        tracing::warn!(title = title, message = message, "user-facing error message");
    }
}
