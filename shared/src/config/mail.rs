//! Mail transport configuration

use serde::{Deserialize, Serialize};

/// Which mail backend delivers auth-code messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Log messages instead of sending (development)
    Console,
    /// Deliver via an SMTP relay
    Smtp,
    /// Deliver via the Mailgun HTTP API
    Mailgun,
}

impl Default for MailTransport {
    fn default() -> Self {
        MailTransport::Console
    }
}

impl std::str::FromStr for MailTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "mock" => Ok(MailTransport::Console),
            "smtp" => Ok(MailTransport::Smtp),
            "mailgun" => Ok(MailTransport::Mailgun),
            _ => Err(format!("Invalid mail transport: {}", s)),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpSettings {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port (default: 587 for STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Username for authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Use STARTTLS (default: true)
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: default_smtp_port(),
            username: None,
            password: None,
            starttls: default_starttls(),
        }
    }
}

impl SmtpSettings {
    /// Create settings for an SMTP relay host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set authentication credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Mailgun API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailgunSettings {
    /// API key for the sending domain
    pub api_key: String,

    /// Sending domain registered with Mailgun
    pub domain: String,

    /// API base URL (region-specific)
    #[serde(default = "default_mailgun_base_url")]
    pub base_url: String,
}

/// Complete mail delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Selected transport backend
    #[serde(default)]
    pub transport: MailTransport,

    /// Default "from" address when the provider has no sender override
    pub from_email: String,

    /// Display name for the default sender
    #[serde(default)]
    pub from_name: Option<String>,

    /// SMTP settings (used when transport is `Smtp`)
    #[serde(default)]
    pub smtp: SmtpSettings,

    /// Mailgun settings (used when transport is `Mailgun`)
    #[serde(default)]
    pub mailgun: Option<MailgunSettings>,

    /// Timeout for outbound delivery requests in seconds
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::Console,
            from_email: String::from("noreply@localhost"),
            from_name: None,
            smtp: SmtpSettings::default(),
            mailgun: None,
            send_timeout_secs: default_send_timeout(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    ///
    /// Reads:
    /// - `MAIL_TRANSPORT` (optional, default: console)
    /// - `MAIL_FROM_EMAIL` / `MAIL_FROM_NAME`
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_STARTTLS`
    /// - `MAILGUN_API_KEY`, `MAILGUN_DOMAIN`, `MAILGUN_BASE_URL`
    pub fn from_env() -> Self {
        let transport = std::env::var("MAIL_TRANSPORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let smtp = SmtpSettings {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| String::from("localhost")),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_smtp_port),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            starttls: std::env::var("SMTP_STARTTLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };

        let mailgun = match (std::env::var("MAILGUN_API_KEY"), std::env::var("MAILGUN_DOMAIN")) {
            (Ok(api_key), Ok(domain)) => Some(MailgunSettings {
                api_key,
                domain,
                base_url: std::env::var("MAILGUN_BASE_URL")
                    .unwrap_or_else(|_| default_mailgun_base_url()),
            }),
            _ => None,
        };

        Self {
            transport,
            from_email: std::env::var("MAIL_FROM_EMAIL")
                .unwrap_or_else(|_| String::from("noreply@localhost")),
            from_name: std::env::var("MAIL_FROM_NAME").ok(),
            smtp,
            mailgun,
            send_timeout_secs: std::env::var("MAIL_SEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_send_timeout),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_mailgun_base_url() -> String {
    String::from("https://api.mailgun.net/v3")
}

fn default_send_timeout() -> u64 {
    30
}
