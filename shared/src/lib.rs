//! Shared utilities and common types for the MailFactor backend
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types
//! - Utility functions (email validation, masking, etc.)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{Environment, MailConfig, MailTransport};
pub use utils::email;
