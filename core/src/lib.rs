//! # MailFactor Core
//!
//! Core domain and provider logic for the MailFactor email MFA backend.
//! This crate contains the provider properties entity, the email one-time-code
//! provider state machine, the collaborator traits it drives (property store,
//! mail notifier, flash messages), and error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
