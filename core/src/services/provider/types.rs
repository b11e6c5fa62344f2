//! Request and view types for the provider

use std::collections::HashMap;

use serde::Serialize;

/// Which provider screen the host platform is rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MfaViewType {
    /// First-time setup screen
    Setup,
    /// Edit screen for an already configured provider
    Edit,
    /// The second-factor challenge screen during login
    Auth,
}

/// The current user driving the provider
///
/// Passed explicitly into every operation that needs identity; the provider
/// holds no ambient session state.
#[derive(Debug, Clone)]
pub struct MfaUser {
    /// Stable user identifier, the property store key
    pub id: String,
    /// The user's account email, fallback destination shown on setup
    pub email: String,
}

impl MfaUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// The parts of an inbound request the provider reads
///
/// Query parameters and body fields, already decoded by the host framework.
#[derive(Debug, Clone, Default)]
pub struct MfaRequest {
    query: HashMap<String, String>,
    body: HashMap<String, String>,
}

impl MfaRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a body field
    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// All query parameters, as received
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// The submitted auth code, trimmed; query takes precedence over body
    pub fn auth_code(&self) -> String {
        self.query
            .get("authCode")
            .or_else(|| self.body.get("authCode"))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// The submitted email address, trimmed
    pub fn email(&self) -> String {
        self.body
            .get("email")
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Whether the request asks for the code to be re-sent
    pub fn resend_requested(&self) -> bool {
        self.query.get("resend").map(String::as_str) == Some("1")
    }
}

/// Data for the setup/edit screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditViewData {
    /// Configured address, or the account email if none is stored yet
    pub email: String,
    /// Last successful verification, formatted; empty if never
    pub last_used: String,
    /// Last property update, formatted; empty if never
    pub updated: String,
}

/// Data for the auth challenge screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthViewData {
    /// Whether the provider is currently locked
    pub is_locked: bool,
    /// Query parameters for the resend link: the inbound parameters plus
    /// `resend=1`. URL encoding is the view layer's concern.
    pub resend_params: HashMap<String, String>,
}

/// Prepared view data for the host platform's renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViewResponse {
    Edit(EditViewData),
    Auth(AuthViewData),
}

impl ViewResponse {
    /// Template identifier the host should render
    pub fn template(&self) -> &'static str {
        match self {
            ViewResponse::Edit(_) => "Edit",
            ViewResponse::Auth(_) => "Auth",
        }
    }
}
