//! Mail module
//!
//! Auth-code delivery backends behind the core's `MailNotifier` trait:
//!
//! - **Console**: log output for development
//! - **SMTP**: delivery via an SMTP relay (lettre)
//! - **Mailgun**: delivery via the Mailgun HTTP API

use std::sync::Arc;

pub mod console;
pub mod mailgun;
pub mod render;
pub mod smtp;

pub use console::ConsoleMailNotifier;
pub use mailgun::MailgunNotifier;
pub use render::{render_auth_code_mail, subject_for, RenderedMail, DEFAULT_TEMPLATE};
pub use smtp::SmtpMailNotifier;

use mf_core::services::provider::{AuthCodeEmail, MailNotifier};
use mf_shared::config::{MailConfig, MailTransport};

/// Create a mail notifier based on configuration
///
/// Returns the backend selected by `transport`; when a backend cannot be
/// initialized, falls back to the console notifier so the application still
/// comes up.
pub fn create_mail_notifier(config: &MailConfig) -> Arc<dyn MailNotifier> {
    match config.transport {
        MailTransport::Console => Arc::new(ConsoleMailNotifier::new()),
        MailTransport::Smtp => match SmtpMailNotifier::new(config) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::error!("Failed to initialize SMTP notifier: {}", e);
                tracing::warn!("Falling back to console mail notifier");
                Arc::new(ConsoleMailNotifier::new())
            }
        },
        MailTransport::Mailgun => match MailgunNotifier::new(config) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::error!("Failed to initialize Mailgun notifier: {}", e);
                tracing::warn!("Falling back to console mail notifier");
                Arc::new(ConsoleMailNotifier::new())
            }
        },
    }
}

/// The sender override carried by a message, if any
fn sender_mailbox(mail: &AuthCodeEmail) -> Option<(String, Option<String>)> {
    mail.sender_email
        .as_ref()
        .map(|email| (email.clone(), mail.sender_name.clone()))
}
