//! Persisted per-user state of the email MFA provider.

use serde::{Deserialize, Serialize};

use super::auth_code::generate_auth_code;

/// Provider properties persisted for one (user, provider) pair
///
/// This is the entire mutable state of the provider for one user. The record
/// lives in the host platform's property store; the field names below match
/// the property keys used there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProperties {
    /// Whether this factor is enabled for the user
    #[serde(default)]
    pub active: bool,

    /// Destination address for auth codes
    #[serde(default)]
    pub email: String,

    /// Current pending one-time code; empty means none outstanding
    #[serde(default)]
    pub auth_code: String,

    /// Consecutive failed verification attempts since the last success or reset
    #[serde(default)]
    pub attempts: u32,

    /// Unix timestamp of the last successful verification, 0 if never
    #[serde(default)]
    pub last_used: i64,

    /// Unix timestamp of the last property update
    #[serde(default)]
    pub updated: i64,
}

impl ProviderProperties {
    /// Creates an activated entry for the given address, as written on setup
    pub fn activated(email: impl Into<String>) -> Self {
        Self {
            active: true,
            email: email.into(),
            ..Default::default()
        }
    }

    /// Whether a one-time code is currently outstanding
    pub fn has_outstanding_code(&self) -> bool {
        !self.auth_code.is_empty()
    }

    /// Rotates in a freshly generated auth code
    pub fn issue_code(&mut self) -> &str {
        self.auth_code = generate_auth_code();
        &self.auth_code
    }

    /// Records a failed verification attempt
    pub fn record_failed_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Records a successful verification at `now`
    ///
    /// Clears the outstanding code, resets the attempt counter and stamps
    /// `last_used`.
    pub fn record_successful_verification(&mut self, now: i64) {
        self.auth_code.clear();
        self.attempts = 0;
        self.last_used = now;
    }

    /// Resets the attempt counter (unlock)
    pub fn reset_attempts(&mut self) {
        self.attempts = 0;
    }

    /// Stamps the record as updated at `now`
    pub fn touch(&mut self, now: i64) {
        self.updated = now;
    }
}
