//! Console mail notifier for development
//!
//! Logs the message instead of sending it. The code itself is redacted by
//! default so captured logs don't leak a live second factor; enable full
//! output only in local development.

use async_trait::async_trait;
use uuid::Uuid;

use mf_core::services::provider::{AuthCodeEmail, MailNotifier};
use mf_shared::utils::email::mask_email;

use super::render::render_auth_code_mail;

/// A notifier that logs auth-code mails instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailNotifier {
    /// Whether to log the actual code (development only)
    show_code: bool,
}

impl ConsoleMailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable logging of the actual code
    pub fn with_code_output(mut self, enabled: bool) -> Self {
        if enabled {
            tracing::warn!(
                "ConsoleMailNotifier: code output enabled - live auth codes will be visible in logs"
            );
        }
        self.show_code = enabled;
        self
    }
}

#[async_trait]
impl MailNotifier for ConsoleMailNotifier {
    async fn send_auth_code(&self, mail: &AuthCodeEmail) -> Result<String, String> {
        let rendered = render_auth_code_mail(mail);
        let message_id = format!("console-{}", Uuid::new_v4());

        if self.show_code {
            tracing::info!(
                to = mail.to.as_str(),
                subject = rendered.subject.as_str(),
                code = mail.code.as_str(),
                message_id = message_id.as_str(),
                "Auth code mail (console transport)"
            );
        } else {
            tracing::info!(
                to = mask_email(&mail.to).as_str(),
                subject = rendered.subject.as_str(),
                message_id = message_id.as_str(),
                "Auth code mail (console transport, code redacted)"
            );
        }

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::render::DEFAULT_TEMPLATE;

    fn mail() -> AuthCodeEmail {
        AuthCodeEmail {
            to: "user@example.com".to_string(),
            code: "048213".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            layout: DEFAULT_TEMPLATE.to_string(),
            sender_email: None,
            sender_name: None,
        }
    }

    #[tokio::test]
    async fn test_send_returns_message_id() {
        let notifier = ConsoleMailNotifier::new();
        let message_id = notifier.send_auth_code(&mail()).await.unwrap();
        assert!(message_id.starts_with("console-"));
    }

    #[tokio::test]
    async fn test_send_with_code_output() {
        let notifier = ConsoleMailNotifier::new().with_code_output(true);
        assert!(notifier.send_auth_code(&mail()).await.is_ok());
    }
}
