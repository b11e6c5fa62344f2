//! Configuration for the email MFA provider

/// Sentinel meaning "no lockout": more failed attempts than any user produces
pub const UNLIMITED_ATTEMPTS: u32 = 9_999_999;

/// Default mail template identifier
const DEFAULT_TEMPLATE: &str = "MfaEmail";

/// Configuration for the email MFA provider
///
/// Mirrors the host platform's extension configuration: everything is
/// optional and falls back to a usable default.
#[derive(Debug, Clone)]
pub struct MailOtpConfig {
    /// Consecutive failed attempts allowed before lockout
    pub max_attempts: u32,
    /// Sender address override; `None` uses the platform default sender
    pub sender_email: Option<String>,
    /// Sender display name, only meaningful with `sender_email`
    pub sender_name: Option<String>,
    /// Mail template identifier
    pub mail_template: String,
    /// Mail layout identifier
    pub mail_layout: String,
}

impl Default for MailOtpConfig {
    fn default() -> Self {
        Self {
            max_attempts: UNLIMITED_ATTEMPTS,
            sender_email: None,
            sender_name: None,
            mail_template: String::from(DEFAULT_TEMPLATE),
            mail_layout: String::from(DEFAULT_TEMPLATE),
        }
    }
}

impl MailOtpConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt limit from a raw configuration value
    ///
    /// `-1` (and any other negative value) means unlimited and is normalized
    /// to [`UNLIMITED_ATTEMPTS`].
    pub fn with_max_attempts(mut self, raw: i64) -> Self {
        self.max_attempts = if raw < 0 || raw >= UNLIMITED_ATTEMPTS as i64 {
            UNLIMITED_ATTEMPTS
        } else {
            raw as u32
        };
        self
    }

    /// Set the sender override
    pub fn with_sender(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        self.sender_email = Some(email.into());
        self.sender_name = Some(name.into());
        self
    }

    /// Set the mail template identifier; blank values keep the default
    pub fn with_template(mut self, template: &str) -> Self {
        if !template.trim().is_empty() {
            self.mail_template = template.trim().to_string();
        }
        self
    }

    /// Set the mail layout identifier; blank values keep the default
    pub fn with_layout(mut self, layout: &str) -> Self {
        if !layout.trim().is_empty() {
            self.mail_layout = layout.trim().to_string();
        }
        self
    }

    /// Create from environment variables
    ///
    /// Reads `MFA_MAX_ATTEMPTS`, `MFA_MAIL_SENDER_EMAIL`,
    /// `MFA_MAIL_SENDER_NAME`, `MFA_MAIL_TEMPLATE`, `MFA_MAIL_LAYOUT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(raw) = std::env::var("MFA_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            config = config.with_max_attempts(raw);
        }
        if let Ok(email) = std::env::var("MFA_MAIL_SENDER_EMAIL") {
            config.sender_email = Some(email);
            config.sender_name = std::env::var("MFA_MAIL_SENDER_NAME").ok();
        }
        if let Ok(template) = std::env::var("MFA_MAIL_TEMPLATE") {
            config = config.with_template(&template);
        }
        if let Ok(layout) = std::env::var("MFA_MAIL_LAYOUT") {
            config = config.with_layout(&layout);
        }

        config
    }
}
