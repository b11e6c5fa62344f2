//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits the provider core
//! drives:
//! - **Store**: property store backends (Redis, in-memory)
//! - **Mail**: auth-code mail notifiers (SMTP, Mailgun, console)

use thiserror::Error;

/// Property store module - Redis and in-memory backends
pub mod store;

/// Mail module - auth-code delivery backends
pub mod mail;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Property store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
