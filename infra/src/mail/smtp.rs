//! SMTP mail notifier using lettre

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use mf_core::services::provider::{AuthCodeEmail, MailNotifier};
use mf_shared::config::MailConfig;
use mf_shared::utils::email::mask_email;

use crate::InfrastructureError;

use super::render::render_auth_code_mail;
use super::sender_mailbox;

/// Auth-code delivery over an SMTP relay
pub struct SmtpMailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: Mailbox,
}

impl SmtpMailNotifier {
    /// Create a notifier from the mail configuration
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let smtp = &config.smtp;

        let mut builder = if smtp.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host).map_err(|e| {
                InfrastructureError::Config(format!("failed to create SMTP transport: {}", e))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host).map_err(|e| {
                InfrastructureError::Config(format!("failed to create SMTP transport: {}", e))
            })?
        };

        builder = builder
            .port(smtp.port)
            .timeout(Some(Duration::from_secs(config.send_timeout_secs)));

        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let default_from = Self::parse_mailbox(&config.from_email, config.from_name.as_deref())?;

        Ok(Self {
            transport: builder.build(),
            default_from,
        })
    }

    fn parse_mailbox(email: &str, name: Option<&str>) -> Result<Mailbox, InfrastructureError> {
        let formatted = match name {
            Some(name) => format!("{} <{}>", name, email),
            None => email.to_string(),
        };
        formatted
            .parse()
            .map_err(|e| InfrastructureError::Config(format!("invalid mail address {}: {}", email, e)))
    }

    fn build_message(&self, mail: &AuthCodeEmail) -> Result<Message, String> {
        let rendered = render_auth_code_mail(mail);

        let from = match sender_mailbox(mail) {
            Some((email, name)) => Self::parse_mailbox(&email, name.as_deref())
                .map_err(|e| e.to_string())?,
            None => self.default_from.clone(),
        };

        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| format!("invalid recipient address: {}", e))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(rendered.subject)
            .multipart(MultiPart::alternative_plain_html(
                rendered.text_body,
                rendered.html_body,
            ))
            .map_err(|e| format!("failed to build message: {}", e))
    }
}

#[async_trait]
impl MailNotifier for SmtpMailNotifier {
    async fn send_auth_code(&self, mail: &AuthCodeEmail) -> Result<String, String> {
        let message = self.build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("SMTP delivery failed: {}", e))?;

        // The relay's queue id is not exposed; hand back a local one.
        let message_id = format!("smtp-{}", Uuid::new_v4());
        tracing::info!(
            to = mask_email(&mail.to).as_str(),
            message_id = message_id.as_str(),
            "Auth code mail delivered via SMTP"
        );

        Ok(message_id)
    }
}
