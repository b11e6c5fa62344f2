//! Mailgun mail notifier
//!
//! Delivers auth-code messages through the Mailgun HTTP API, with retry
//! logic and exponential backoff for transient failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use mf_core::services::provider::{AuthCodeEmail, MailNotifier};
use mf_shared::config::{MailConfig, MailgunSettings};
use mf_shared::utils::email::mask_email;

use crate::InfrastructureError;

use super::render::{render_auth_code_mail, RenderedMail};
use super::sender_mailbox;

/// Mailgun notifier configuration
#[derive(Debug, Clone)]
pub struct MailgunNotifierConfig {
    /// API settings for the sending domain
    pub settings: MailgunSettings,
    /// Default "from" header when the provider has no sender override
    pub default_from: String,
    /// Maximum attempts for failed requests
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

/// Successful send response from the Mailgun API
#[derive(Debug, Deserialize)]
struct MailgunSendResponse {
    id: String,
}

/// Auth-code delivery via the Mailgun HTTP API
pub struct MailgunNotifier {
    http: reqwest::Client,
    config: MailgunNotifierConfig,
}

impl MailgunNotifier {
    /// Create a notifier from the mail configuration
    ///
    /// Fails when no Mailgun settings are configured.
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let settings = config
            .mailgun
            .clone()
            .ok_or_else(|| InfrastructureError::Config("Mailgun settings not set".to_string()))?;

        let notifier_config = MailgunNotifierConfig {
            settings,
            default_from: match &config.from_name {
                Some(name) => format!("{} <{}>", name, config.from_email),
                None => config.from_email.clone(),
            },
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: config.send_timeout_secs,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(notifier_config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(
            domain = notifier_config.settings.domain.as_str(),
            "Mailgun notifier initialized"
        );

        Ok(Self {
            http,
            config: notifier_config,
        })
    }

    /// The messages endpoint for the configured domain
    fn endpoint(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.settings.base_url.trim_end_matches('/'),
            self.config.settings.domain
        )
    }

    /// The "from" header for one message
    fn from_header(&self, mail: &AuthCodeEmail) -> String {
        match sender_mailbox(mail) {
            Some((email, Some(name))) => format!("{} <{}>", name, email),
            Some((email, None)) => email,
            None => self.config.default_from.clone(),
        }
    }

    /// Whether a response status is worth retrying
    fn is_retryable(status: reqwest::StatusCode) -> bool {
        status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Send with retry logic
    async fn send_with_retry(
        &self,
        mail: &AuthCodeEmail,
        rendered: &RenderedMail,
    ) -> Result<String, String> {
        let endpoint = self.endpoint();
        let from = self.from_header(mail);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                attempt = attempts,
                max = self.config.max_retries,
                to = mask_email(&mail.to).as_str(),
                "Sending auth code mail via Mailgun"
            );

            let params = [
                ("from", from.as_str()),
                ("to", mail.to.as_str()),
                ("subject", rendered.subject.as_str()),
                ("text", rendered.text_body.as_str()),
                ("html", rendered.html_body.as_str()),
            ];

            let response = self
                .http
                .post(&endpoint)
                .basic_auth("api", Some(&self.config.settings.api_key))
                .form(&params)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    let body: MailgunSendResponse = response
                        .json()
                        .await
                        .map_err(|e| format!("invalid Mailgun response: {}", e))?;
                    info!(
                        to = mask_email(&mail.to).as_str(),
                        message_id = body.id.as_str(),
                        "Auth code mail accepted by Mailgun"
                    );
                    return Ok(body.id);
                }
                Ok(response) => {
                    let status = response.status();
                    let detail = response.text().await.unwrap_or_default();
                    error!(
                        status = %status,
                        attempt = attempts,
                        "Mailgun rejected the message"
                    );

                    if !Self::is_retryable(status) {
                        return Err(format!("Mailgun rejected the message ({}): {}", status, detail));
                    }
                    if attempts >= self.config.max_retries {
                        return Err(format!(
                            "Mailgun send failed after {} attempts ({})",
                            attempts, status
                        ));
                    }
                    warn!(status = %status, "Transient Mailgun error, backing off for {:?}", delay);
                }
                Err(e) => {
                    error!(error = %e, attempt = attempts, "Mailgun request failed");
                    if attempts >= self.config.max_retries {
                        return Err(format!("Mailgun send failed after {} attempts: {}", attempts, e));
                    }
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl MailNotifier for MailgunNotifier {
    async fn send_auth_code(&self, mail: &AuthCodeEmail) -> Result<String, String> {
        let rendered = render_auth_code_mail(mail);
        self.send_with_retry(mail, &rendered).await
    }
}
