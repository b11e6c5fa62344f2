//! Email one-time-code MFA provider
//!
//! This module implements the provider the host platform drives through its
//! MFA plugin seam:
//! - activation and email (re)configuration
//! - one-time code issuance and resending by mail
//! - verification with attempt tracking and lockout
//! - unlock and deactivation
//! - view data preparation for the setup/edit and auth screens

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::{MailOtpConfig, UNLIMITED_ATTEMPTS};
pub use service::MailOtpProvider;
pub use traits::{AuthCodeEmail, FlashMessenger, MailNotifier, PropertyStore, TracingFlash};
pub use types::{AuthViewData, EditViewData, MfaRequest, MfaUser, MfaViewType, ViewResponse};
